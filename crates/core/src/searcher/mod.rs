//! Torrent search abstraction.
//!
//! This module provides the [`TorrentSearcher`] trait for querying a torrent
//! aggregator by title, plus the HTTP client implementation for the
//! aggregator's search endpoint.

mod aggregator;
mod types;

pub use aggregator::AggregatorClient;
pub use types::*;
