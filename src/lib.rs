//! Client-credentials client for the Spotify Web API search endpoint.
//!
//! The client fetches a bearer token lazily, refreshes it once when the API
//! answers 403 and waits out a single 429 before giving up.

pub mod config;
pub mod error;
pub mod spotify;

pub use error::{Result, SpotifyError};
pub use spotify::search::{SearchKind, SearchQuery};
pub use spotify::{SpotifyClient, SpotifyClientBuilder};
