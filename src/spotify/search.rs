use crate::error::{Result, SpotifyError};
use crate::spotify::SpotifyClient;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Catalog categories accepted by the `type` parameter of the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
}

impl SearchKind {
    pub const ALL: [SearchKind; 5] = [
        SearchKind::Artist,
        SearchKind::Playlist,
        SearchKind::Track,
        SearchKind::Show,
        SearchKind::Episode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Artist => "artist",
            SearchKind::Playlist => "playlist",
            SearchKind::Track => "track",
            SearchKind::Show => "show",
            SearchKind::Episode => "episode",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = SpotifyError;

    fn from_str(s: &str) -> Result<Self> {
        SearchKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SpotifyError::InvalidArgument(format!("Invalid search type: {s}")))
    }
}

/// Parameters for a single search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub kind: Option<SearchKind>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: None,
            limit: None,
        }
    }

    pub fn kind(mut self, kind: SearchKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query string pairs in the order they are sent.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>> {
        if self.query.trim().is_empty() {
            return Err(SpotifyError::InvalidArgument(
                "search query must not be empty".to_string(),
            ));
        }

        let mut params = vec![("q", self.query.clone())];

        if let Some(kind) = self.kind {
            params.push(("type", kind.as_str().to_string()));
        }

        if let Some(limit) = self.limit {
            if limit == 0 {
                return Err(SpotifyError::InvalidArgument(
                    "limit must be a positive integer".to_string(),
                ));
            }
            params.push(("limit", limit.to_string()));
        }

        Ok(params)
    }
}

impl SpotifyClient {
    /// Search the catalog and return the raw JSON payload.
    ///
    /// # Example
    /// ```no_run
    /// # use spotify_search::{SearchKind, SpotifyClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SpotifyClient::new("client-id", "client-secret")?;
    /// let artists = client.search("Miles Davis", Some(SearchKind::Artist), Some(5)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(
        &self,
        query: &str,
        kind: Option<SearchKind>,
        limit: Option<u32>,
    ) -> Result<Value> {
        let query = SearchQuery {
            query: query.to_string(),
            kind,
            limit,
        };
        self.search_query(&query).await
    }

    pub async fn search_query(&self, query: &SearchQuery) -> Result<Value> {
        let params = query.to_params()?;
        self.get("search", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_render_lowercase() {
        let rendered: Vec<&str> = SearchKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(rendered, ["artist", "playlist", "track", "show", "episode"]);
        assert_eq!(SearchKind::Episode.to_string(), "episode");
    }

    #[test]
    fn parse_kind_ignores_case() {
        assert_eq!("ARTIST".parse::<SearchKind>().unwrap(), SearchKind::Artist);
        assert_eq!("Show".parse::<SearchKind>().unwrap(), SearchKind::Show);
    }

    #[test]
    fn parse_unknown_kind_is_invalid_argument() {
        let err = "album".parse::<SearchKind>().unwrap_err();
        assert!(matches!(err, SpotifyError::InvalidArgument(_)));
    }

    #[test]
    fn params_include_type_and_limit() {
        let params = SearchQuery::new("Miles Davis")
            .kind(SearchKind::Artist)
            .limit(5)
            .to_params()
            .unwrap();
        assert_eq!(
            params,
            vec![
                ("q", "Miles Davis".to_string()),
                ("type", "artist".to_string()),
                ("limit", "5".to_string()),
            ]
        );
    }

    #[test]
    fn params_only_query_when_optional_missing() {
        let params = SearchQuery::new("x").to_params().unwrap();
        assert_eq!(params, vec![("q", "x".to_string())]);
    }

    #[test]
    fn empty_query_rejected() {
        let err = SearchQuery::new("   ").to_params().unwrap_err();
        assert!(matches!(err, SpotifyError::InvalidArgument(_)));
    }

    #[test]
    fn zero_limit_rejected() {
        let err = SearchQuery::new("x").limit(0).to_params().unwrap_err();
        assert!(matches!(err, SpotifyError::InvalidArgument(_)));
    }
}
