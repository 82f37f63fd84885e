//! Metadata providers - paginated listings and per-title detail lookups.
//!
//! TMDB serves the movie and show kinds, Kitsu serves the anime kinds.
//! Both are exposed through one trait so the scrapers stay
//! provider-agnostic.

mod kitsu;
mod tmdb;
mod types;

pub use kitsu::KitsuClient;
pub use tmdb::TmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::ContentKind;

/// Errors that can occur when talking to a metadata provider.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    /// The provider does not serve this content kind.
    #[error("Content kind not served by this provider: {0}")]
    UnsupportedKind(ContentKind),
}

/// Trait for metadata providers.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Fetch one page of the provider's listing for a content kind.
    ///
    /// A `None` cursor starts from the first page. The returned page
    /// carries the cursor of the next one; `None` means the listing is
    /// exhausted. An empty page also ends the walk.
    async fn list_page(
        &self,
        kind: ContentKind,
        cursor: Option<String>,
    ) -> Result<CandidatePage, MetadataError>;

    /// Fetch the full episode ledger of a serialized title.
    async fn fetch_episodes(&self, key: &str) -> Result<Vec<EpisodeInfo>, MetadataError>;

    /// Resolve a provider genre reference into genre names.
    async fn fetch_genres(&self, genre_ref: &str) -> Result<Vec<String>, MetadataError>;
}
