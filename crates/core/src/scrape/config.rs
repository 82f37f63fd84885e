//! Scrape configuration.

use serde::{Deserialize, Serialize};

use crate::catalog::ContentKind;
use crate::metadata::CatalogCandidate;
use crate::release::QualityOrder;

/// Which value identifies an item within its kind. The historical system
/// disagreed with itself here, so the policy is configured rather than
/// hard-coded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    #[default]
    Title,
    ProviderId,
}

impl DedupKey {
    /// The catalog key for a candidate under this policy.
    pub fn key_for(&self, candidate: &CatalogCandidate) -> String {
        match self {
            DedupKey::Title => candidate.title.trim().to_string(),
            DedupKey::ProviderId => candidate.provider_id.clone(),
        }
    }
}

/// Configuration shared by all item scrapers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Maximum candidates in flight per scraper. Validated into the 3-20
    /// band; the default stays gentle on the aggregator.
    #[serde(default = "default_max_concurrent_items")]
    pub max_concurrent_items: usize,

    /// Whether a candidate with no stored record and no resolved releases
    /// is still inserted as a metadata-only item.
    #[serde(default)]
    pub persist_without_releases: bool,

    /// Identity policy for catalog keys.
    #[serde(default)]
    pub dedup_key: DedupKey,

    /// Scan-order policy for quality-ambiguous release names.
    #[serde(default)]
    pub quality_order: QualityOrder,

    /// Content kinds the bulk run covers.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<ContentKind>,
}

fn default_max_concurrent_items() -> usize {
    5
}

fn default_kinds() -> Vec<ContentKind> {
    ContentKind::ALL.to_vec()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_concurrent_items: default_max_concurrent_items(),
            persist_without_releases: false,
            dedup_key: DedupKey::default(),
            quality_order: QualityOrder::default(),
            kinds: default_kinds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_default_config() {
        let config = ScrapeConfig::default();
        assert_eq!(config.max_concurrent_items, 5);
        assert!(!config.persist_without_releases);
        assert_eq!(config.dedup_key, DedupKey::Title);
        assert_eq!(config.quality_order, QualityOrder::UhdLast);
        assert_eq!(config.kinds.len(), 4);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: ScrapeConfig = toml::from_str("").unwrap();
        assert_eq!(config, ScrapeConfig::default());
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            max_concurrent_items = 10
            persist_without_releases = true
            dedup_key = "provider_id"
            quality_order = "uhd_first"
            kinds = ["movie", "anime_show"]
        "#;
        let config: ScrapeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_concurrent_items, 10);
        assert!(config.persist_without_releases);
        assert_eq!(config.dedup_key, DedupKey::ProviderId);
        assert_eq!(config.quality_order, QualityOrder::UhdFirst);
        assert_eq!(
            config.kinds,
            vec![ContentKind::Movie, ContentKind::AnimeShow]
        );
    }

    #[test]
    fn test_dedup_key_policies() {
        let candidate = fixtures::candidate("1396", ContentKind::Show, "  Breaking Bad ");
        assert_eq!(DedupKey::Title.key_for(&candidate), "Breaking Bad");
        assert_eq!(DedupKey::ProviderId.key_for(&candidate), "1396");
    }
}
