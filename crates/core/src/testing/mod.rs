//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits
//! so scraper runs can be tested end to end without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use nitrate_core::testing::{fixtures, MockCatalog, MockMetadata, MockSearcher};
//!
//! let catalog = MockCatalog::new();
//! let metadata = MockMetadata::new();
//! let searcher = MockSearcher::new();
//!
//! metadata.set_candidates(ContentKind::Show, vec![
//!     fixtures::candidate("1396", ContentKind::Show, "Breaking Bad"),
//! ]).await;
//! searcher.set_results(vec![
//!     fixtures::release("Breaking.Bad.S01E01.1080p", "40"),
//! ]).await;
//! ```

mod mock_catalog;
mod mock_metadata;
mod mock_searcher;

pub use mock_catalog::{CatalogOp, MockCatalog};
pub use mock_metadata::MockMetadata;
pub use mock_searcher::MockSearcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::ContentKind;
    use crate::metadata::{CatalogCandidate, EpisodeInfo};
    use crate::searcher::Release;

    /// Create a test release with reasonable defaults. The category is one
    /// the show filters accept.
    pub fn release(name: &str, seeders: &str) -> Release {
        Release {
            name: name.to_string(),
            size: "1.4 GB".to_string(),
            date: "2024-05-01 12:00".to_string(),
            seeders: seeders.to_string(),
            leechers: "3".to_string(),
            url: format!("https://tracker.example/{}", name.len()),
            uploader: "uploader".to_string(),
            category: "TV Shows".to_string(),
            poster: String::new(),
            magnet: format!("magnet:?xt=urn:btih:{:040}", name.len()),
            hash: format!("{:040}", name.len()),
        }
    }

    /// Release filed under a movie category.
    pub fn movie_release(name: &str, seeders: &str) -> Release {
        let mut r = release(name, seeders);
        r.category = "Video > Movies".to_string();
        r.size = "4.2 GB".to_string();
        r
    }

    /// Release filed under an anime category.
    pub fn anime_release(name: &str, seeders: &str) -> Release {
        let mut r = release(name, seeders);
        r.category = "Anime".to_string();
        r
    }

    /// Create a test metadata candidate with populated attributes.
    pub fn candidate(provider_id: &str, kind: ContentKind, title: &str) -> CatalogCandidate {
        let mut candidate = CatalogCandidate {
            provider_id: provider_id.to_string(),
            kind,
            title: title.to_string(),
            attributes: Default::default(),
            genre_ref: None,
            source_updated_at: None,
        };
        candidate.attributes.synopsis = format!("A story about {}.", title.to_lowercase());
        candidate.attributes.start_date = Some("2020-01-01".to_string());
        candidate.attributes.average_rating = Some("8.1".to_string());
        candidate.attributes.popularity_rank = Some(10);
        candidate.attributes.poster_url = Some("https://img.example/poster.jpg".to_string());
        candidate
    }

    /// Ledger of `seasons` seasons with `per_season` episodes each.
    pub fn episode_ledger(seasons: u32, per_season: u32) -> Vec<EpisodeInfo> {
        let mut ledger = Vec::new();
        for season in 1..=seasons {
            for episode in 1..=per_season {
                ledger.push(EpisodeInfo {
                    season,
                    episode,
                    title: Some(format!("Episode {}", episode)),
                    air_date: None,
                });
            }
        }
        ledger
    }
}
