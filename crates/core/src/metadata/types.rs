//! Provider-neutral metadata types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{ContentKind, ItemAttributes};

/// One title from a provider listing, normalized for the scrapers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCandidate {
    /// Provider-side id, stable across runs.
    pub provider_id: String,
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub attributes: ItemAttributes,
    /// Opaque reference the same provider resolves into genre names.
    #[serde(default)]
    pub genre_ref: Option<String>,
    /// Last-updated timestamp reported by the provider, when it has one.
    #[serde(default)]
    pub source_updated_at: Option<DateTime<Utc>>,
}

/// One page of a provider listing.
#[derive(Debug, Clone, Default)]
pub struct CandidatePage {
    pub items: Vec<CatalogCandidate>,
    /// Cursor of the page after this one, `None` when exhausted.
    pub next: Option<String>,
}

impl CandidatePage {
    /// Whether the listing walk should stop after this page.
    pub fn is_last(&self) -> bool {
        self.next.is_none() || self.items.is_empty()
    }
}

/// One row of a serialized title's episode ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    pub season: u32,
    pub episode: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deserializes_with_defaults() {
        let json = r#"{"provider_id":"42","kind":"movie","title":"Test"}"#;
        let candidate: CatalogCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.provider_id, "42");
        assert_eq!(candidate.kind, ContentKind::Movie);
        assert!(candidate.genre_ref.is_none());
        assert!(candidate.source_updated_at.is_none());
        assert_eq!(candidate.attributes, ItemAttributes::default());
    }

    #[test]
    fn test_page_is_last() {
        let empty = CandidatePage::default();
        assert!(empty.is_last());

        let candidate = CatalogCandidate {
            provider_id: "1".to_string(),
            kind: ContentKind::Show,
            title: "T".to_string(),
            attributes: ItemAttributes::default(),
            genre_ref: None,
            source_updated_at: None,
        };

        let with_next = CandidatePage {
            items: vec![candidate.clone()],
            next: Some("2".to_string()),
        };
        assert!(!with_next.is_last());

        let without_next = CandidatePage {
            items: vec![candidate],
            next: None,
        };
        assert!(without_next.is_last());
    }
}
