pub mod auth;
pub mod search;

use crate::config::SpotifyConfig;
use crate::error::{Result, SpotifyError};
use log::{debug, trace, warn};
use oauth2::basic::BasicClient;
use oauth2::{AuthType, AuthUrl, ClientId, ClientSecret, TokenUrl};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

pub const SPOTIFY_API: &str = "https://api.spotify.com/v1/";
pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_WAIT_TIME: Duration = Duration::from_secs(30);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Spotify Web API client authenticated with the client-credentials grant.
///
/// The bearer token is fetched on the first request and kept in memory only.
#[derive(Debug)]
pub struct SpotifyClient {
    http: Client,
    oauth: BasicClient,
    api_base_url: String,
    wait_time: Duration,
    token: Mutex<Option<String>>,
}

impl SpotifyClient {
    /// Create a client with the default 30 second rate-limit wait.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::builder(client_id, client_secret).build()
    }

    pub fn with_wait_time(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        wait_time: Duration,
    ) -> Result<Self> {
        Self::builder(client_id, client_secret)
            .wait_time(wait_time)
            .build()
    }

    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> SpotifyClientBuilder {
        SpotifyClientBuilder::new(client_id.into(), client_secret.into())
    }

    /// Build a client from the `[spotify]` section of the configuration file.
    pub fn from_config(config: &SpotifyConfig) -> Result<Self> {
        Self::with_wait_time(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.wait_time(),
        )
    }

    /// How long a rate-limited request waits before its single retry.
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// Whether a bearer token is currently cached.
    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Authenticated GET against `api_base_url + endpoint`.
    ///
    /// A 403 clears the token and retries once with a fresh one. A 429 waits
    /// `wait_time` and retries once with the same token. Each condition is
    /// retried at most once per call, so a call makes at most three requests.
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.api_base_url, endpoint);
        let mut auth_retried = false;
        let mut rate_limit_retried = false;

        loop {
            let token = self.bearer_token().await?;

            trace!("GET {} {:?}", url, params);
            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(params)
                .send()
                .await?;

            let status = response.status();
            debug!("response status: {}", status);

            match status {
                StatusCode::FORBIDDEN if !auth_retried => {
                    debug!("response was unauthorized, retrying");
                    self.clear_token().await;
                    auth_retried = true;
                }
                StatusCode::FORBIDDEN => return Err(SpotifyError::Unauthorized { url }),
                StatusCode::TOO_MANY_REQUESTS if !rate_limit_retried => {
                    warn!(
                        "Rate limited. Retrying after {} seconds...",
                        self.wait_time.as_secs_f64()
                    );
                    sleep(self.wait_time).await;
                    rate_limit_retried = true;
                }
                StatusCode::TOO_MANY_REQUESTS => return Err(SpotifyError::RateLimited { url }),
                status if !status.is_success() => {
                    return Err(SpotifyError::Http {
                        status: status.as_u16(),
                        url,
                    })
                }
                _ => {
                    let body = response.bytes().await?;
                    return Ok(serde_json::from_slice(&body)?);
                }
            }
        }
    }

    /// Returns the cached token, authenticating first if there is none.
    async fn bearer_token(&self) -> Result<String> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.request_token().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    async fn clear_token(&self) {
        *self.token.lock().await = None;
    }
}

/// Builder for configuring a [`SpotifyClient`].
#[derive(Debug)]
pub struct SpotifyClientBuilder {
    client_id: String,
    client_secret: String,
    wait_time: Duration,
    api_base_url: String,
    token_url: String,
    timeout: Duration,
}

impl SpotifyClientBuilder {
    fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            wait_time: DEFAULT_WAIT_TIME,
            api_base_url: SPOTIFY_API.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// How long to wait before retrying a rate-limited request.
    pub fn wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = wait_time;
        self
    }

    /// Base URL endpoints are appended to. Must end with `/`.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Request timeout for API calls and the token exchange.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SpotifyClient> {
        let token_url =
            TokenUrl::new(self.token_url).map_err(|e| SpotifyError::Config(e.to_string()))?;
        let auth_url = AuthUrl::new(SPOTIFY_AUTH_URL.to_string())
            .map_err(|e| SpotifyError::Config(e.to_string()))?;

        // Spotify expects the credentials in the form body, not as basic auth.
        let oauth = BasicClient::new(
            ClientId::new(self.client_id),
            Some(ClientSecret::new(self.client_secret)),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SpotifyError::Config(e.to_string()))?;

        Ok(SpotifyClient {
            http,
            oauth,
            api_base_url: self.api_base_url,
            wait_time: self.wait_time,
            token: Mutex::new(None),
        })
    }
}
