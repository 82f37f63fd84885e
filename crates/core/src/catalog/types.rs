//! Catalog item data model.
//!
//! One document type serves all four content kinds: movies carry their
//! releases in the flat quality map, serialized kinds in the season map plus
//! the uncategorized bucket. All maps are `BTreeMap` so serialized documents
//! come out deterministic.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::release::Quality;
use crate::searcher::Release;

/// Discriminant for the four content kinds. Doubles as the storage partition
/// key and the scraper dispatch tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Movie,
    Show,
    AnimeMovie,
    AnimeShow,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Movie,
        ContentKind::Show,
        ContentKind::AnimeMovie,
        ContentKind::AnimeShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Show => "show",
            ContentKind::AnimeMovie => "anime_movie",
            ContentKind::AnimeShow => "anime_show",
        }
    }

    /// Whether this kind has an episode grid (and therefore a ledger and
    /// backfill pass).
    pub fn is_serialized(&self) -> bool {
        matches!(self, ContentKind::Show | ContentKind::AnimeShow)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive attributes of a catalog item, normalized across providers.
/// Provider date and rating values stay as text; they are compared, not
/// computed with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemAttributes {
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub average_rating: Option<String>,
    #[serde(default)]
    pub popularity_rank: Option<i64>,
    #[serde(default)]
    pub rating_rank: Option<i64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub episode_count: Option<u32>,
}

/// Ranked releases for one slot, keyed by quality tag.
pub type QualityBuckets = BTreeMap<Quality, Vec<Release>>;

/// Sort releases by seeder count, descending. Non-numeric seeder text ranks
/// last; the sort is stable so equal counts keep their input order.
pub fn rank_by_seeders(releases: &mut [Release]) {
    releases.sort_by_key(|r| std::cmp::Reverse(r.seeders_count().unwrap_or(i64::MIN)));
}

/// season number -> episode number -> quality -> ranked releases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonMap(pub BTreeMap<u32, BTreeMap<u32, QualityBuckets>>);

impl SeasonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, season: u32, episode: u32, quality: Quality, release: Release) {
        self.0
            .entry(season)
            .or_default()
            .entry(episode)
            .or_default()
            .entry(quality)
            .or_default()
            .push(release);
    }

    /// Re-rank every quality bucket.
    pub fn sort_all(&mut self) {
        for episodes in self.0.values_mut() {
            for buckets in episodes.values_mut() {
                for releases in buckets.values_mut() {
                    rank_by_seeders(releases);
                }
            }
        }
    }

    /// Re-rank the buckets of a single (season, episode) slot.
    pub fn sort_slot(&mut self, season: u32, episode: u32) {
        if let Some(buckets) = self.0.get_mut(&season).and_then(|eps| eps.get_mut(&episode)) {
            for releases in buckets.values_mut() {
                rank_by_seeders(releases);
            }
        }
    }

    /// Whether the slot holds at least one release in any quality bucket.
    pub fn has_episode(&self, season: u32, episode: u32) -> bool {
        self.0
            .get(&season)
            .and_then(|eps| eps.get(&episode))
            .map(|buckets| buckets.values().any(|r| !r.is_empty()))
            .unwrap_or(false)
    }

    /// All (season, episode) pairs holding at least one release.
    pub fn resolved_pairs(&self) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        for (&season, episodes) in &self.0 {
            for (&episode, buckets) in episodes {
                if buckets.values().any(|r| !r.is_empty()) {
                    pairs.push((season, episode));
                }
            }
        }
        pairs
    }

    pub fn season_count(&self) -> usize {
        self.0.len()
    }

    pub fn release_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|eps| eps.values())
            .flat_map(|buckets| buckets.values())
            .map(|r| r.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.release_count() == 0
    }
}

/// Flat quality -> ranked releases map for kinds without an episode grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityMap(pub QualityBuckets);

impl QualityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quality: Quality, release: Release) {
        self.0.entry(quality).or_default().push(release);
    }

    pub fn sort_all(&mut self) {
        for releases in self.0.values_mut() {
            rank_by_seeders(releases);
        }
    }

    pub fn release_count(&self) -> usize {
        self.0.values().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.release_count() == 0
    }
}

/// Releases that could not be placed on the episode grid: full-season and
/// complete-series packs plus parser misses. Keyed by release name, kept
/// apart from the grid, never merged into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UncategorizedBucket(pub BTreeMap<String, Release>);

impl UncategorizedBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keyed by name; the first release seen under a name wins.
    pub fn insert(&mut self, release: Release) {
        self.0.entry(release.name.clone()).or_insert(release);
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A stored catalog record: provider metadata plus the resolved release
/// structures for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Identity key within the kind: provider id or title, per the
    /// configured dedup policy.
    pub key: String,
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub attributes: ItemAttributes,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Last-updated timestamp reported by the metadata provider.
    #[serde(default)]
    pub source_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seasons: SeasonMap,
    #[serde(default)]
    pub qualities: QualityMap,
    #[serde(default)]
    pub uncategorized: UncategorizedBucket,
}

impl CatalogItem {
    pub fn new(key: impl Into<String>, kind: ContentKind, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            title: title.into(),
            attributes: ItemAttributes::default(),
            genres: Vec::new(),
            source_updated_at: None,
            seasons: SeasonMap::new(),
            qualities: QualityMap::new(),
            uncategorized: UncategorizedBucket::new(),
        }
    }

    /// Whether any release at all was resolved for this item.
    pub fn has_releases(&self) -> bool {
        !self.seasons.is_empty() || !self.qualities.is_empty() || !self.uncategorized.is_empty()
    }
}

/// Errors from catalog storage.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Item already exists: {0}")]
    Duplicate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(name: &str, seeders: &str) -> Release {
        Release {
            name: name.into(),
            seeders: seeders.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_content_kind_strings() {
        assert_eq!(ContentKind::Movie.as_str(), "movie");
        assert_eq!(ContentKind::AnimeShow.as_str(), "anime_show");
        assert_eq!(
            serde_json::to_string(&ContentKind::AnimeMovie).unwrap(),
            "\"anime_movie\""
        );
        let parsed: ContentKind = serde_json::from_str("\"show\"").unwrap();
        assert_eq!(parsed, ContentKind::Show);
    }

    #[test]
    fn test_content_kind_serialized_flag() {
        assert!(ContentKind::Show.is_serialized());
        assert!(ContentKind::AnimeShow.is_serialized());
        assert!(!ContentKind::Movie.is_serialized());
        assert!(!ContentKind::AnimeMovie.is_serialized());
    }

    #[test]
    fn test_rank_by_seeders_descending_non_numeric_last() {
        let mut releases = vec![
            release("a", "3"),
            release("b", "n/a"),
            release("c", "120"),
            release("d", "9"),
        ];
        rank_by_seeders(&mut releases);
        let names: Vec<_> = releases.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["c", "d", "a", "b"]);
    }

    #[test]
    fn test_rank_by_seeders_is_stable_for_ties() {
        let mut releases = vec![release("first", "5"), release("second", "5")];
        rank_by_seeders(&mut releases);
        assert_eq!(releases[0].name, "first");
        assert_eq!(releases[1].name, "second");
    }

    #[test]
    fn test_season_map_insert_and_lookup() {
        let mut map = SeasonMap::new();
        map.insert(1, 2, Quality::Hd1080, release("ep", "10"));
        assert!(map.has_episode(1, 2));
        assert!(!map.has_episode(1, 3));
        assert!(!map.has_episode(2, 2));
        assert_eq!(map.season_count(), 1);
        assert_eq!(map.release_count(), 1);
        assert_eq!(map.resolved_pairs(), vec![(1, 2)]);
    }

    #[test]
    fn test_season_map_sort_all() {
        let mut map = SeasonMap::new();
        map.insert(1, 1, Quality::Hd720, release("low", "2"));
        map.insert(1, 1, Quality::Hd720, release("high", "50"));
        map.sort_all();
        let releases = &map.0[&1][&1][&Quality::Hd720];
        assert_eq!(releases[0].name, "high");
        assert_eq!(releases[1].name, "low");
    }

    #[test]
    fn test_bucket_keyed_by_name_first_wins() {
        let mut bucket = UncategorizedBucket::new();
        bucket.insert(release("Show COMPLETE", "10"));
        bucket.insert(release("Show COMPLETE", "99"));
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.0["Show COMPLETE"].seeders, "10");
        assert!(bucket.contains_name("Show COMPLETE"));
    }

    #[test]
    fn test_quality_map_counts_and_sorts() {
        let mut map = QualityMap::new();
        map.insert(Quality::Hd1080, release("b", "1"));
        map.insert(Quality::Hd1080, release("a", "7"));
        map.insert(Quality::Unknown, release("c", "3"));
        assert_eq!(map.release_count(), 3);
        map.sort_all();
        assert_eq!(map.0[&Quality::Hd1080][0].name, "a");
    }

    #[test]
    fn test_catalog_item_round_trips_as_json() {
        let mut item = CatalogItem::new("breaking-bad", ContentKind::Show, "Breaking Bad");
        item.attributes.synopsis = "A chemistry teacher turns to crime.".into();
        item.attributes.poster_url = Some("http://img/poster.jpg".into());
        item.genres = vec!["Drama".into(), "Crime".into()];
        item.seasons
            .insert(1, 1, Quality::Hd1080, release("BB.S01E01.1080p", "42"));
        item.uncategorized.insert(release("BB COMPLETE", "7"));

        let json = serde_json::to_string(&item).unwrap();
        let back: CatalogItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
        assert!(back.has_releases());
    }

    #[test]
    fn test_has_releases_counts_every_structure() {
        let mut item = CatalogItem::new("k", ContentKind::Movie, "Title");
        assert!(!item.has_releases());
        item.qualities.insert(Quality::Sd480, release("m", "1"));
        assert!(item.has_releases());

        let mut packs_only = CatalogItem::new("k2", ContentKind::Show, "Title");
        packs_only.uncategorized.insert(release("T COMPLETE", "3"));
        assert!(packs_only.has_releases());
    }
}
