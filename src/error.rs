use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpotifyError>;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to retrieve auth token: {url}")]
    Unauthorized { url: String },

    #[error("You are being rate limited, consider increasing wait time between failed requests: {url}")]
    RateLimited { url: String },

    #[error("HTTP status {status} for url ({url})")]
    Http { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}
