//! Torrent search types shared by the aggregator client and its consumers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single candidate release returned by the torrent aggregator.
///
/// Numeric-looking fields (`seeders`, `leechers`) arrive as text on the wire
/// and are stored as-is; [`Release::seeders_count`] parses on demand for
/// ranking. `uploader` and `poster` are display-only and never participate in
/// resolution logic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub seeders: String,
    #[serde(default)]
    pub leechers: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub uploader: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub magnet: String,
    #[serde(default)]
    pub hash: String,
}

impl Release {
    /// Seeder count as an integer, `None` when the text is not numeric.
    /// Non-numeric values rank below every numeric one.
    pub fn seeders_count(&self) -> Option<i64> {
        self.seeders.trim().parse().ok()
    }
}

/// Errors from a torrent search. All of these are transient and item-scoped:
/// callers log them and skip the affected item.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search timed out after {0}s")]
    Timeout(u64),

    #[error("Aggregator API error: {0}")]
    ApiError(String),

    #[error("Failed to decode search response: {0}")]
    Decode(String),
}

/// A source of candidate releases for a title query.
///
/// One call returns one flat list; the engine applies no pagination here and
/// treats a single page of results as exhaustive.
#[async_trait]
pub trait TorrentSearcher: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<Vec<Release>, SearchError>;
}
