use crate::error::{Result, SpotifyError};
use crate::spotify::SpotifyClient;
use log::debug;
use oauth2::{HttpRequest, HttpResponse, RequestTokenError, TokenResponse};

impl SpotifyClient {
    /// Exchange the client credentials for a new bearer token and cache it,
    /// replacing any token already held.
    pub async fn authenticate(&self) -> Result<()> {
        let token = self.request_token().await?;
        *self.token.lock().await = Some(token);
        Ok(())
    }

    /// Performs the client-credentials exchange without touching the cache.
    pub(crate) async fn request_token(&self) -> Result<String> {
        debug!("Retrieving token");
        let token_result = self
            .oauth
            .exchange_client_credentials()
            .request_async(|request| self.send_token_request(request))
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(response) => {
                    SpotifyError::TokenExchange(response.to_string())
                }
                other => SpotifyError::TokenExchange(other.to_string()),
            })?;

        Ok(token_result.access_token().secret().to_string())
    }

    /// Sends the token request through the client's own `reqwest::Client`
    /// so the configured timeout also covers the token endpoint.
    async fn send_token_request(
        &self,
        request: HttpRequest,
    ) -> std::result::Result<HttpResponse, reqwest::Error> {
        let response = self
            .http
            .request(request.method, request.url.as_str())
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status_code = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}
