//! Change detection - deciding whether a fetched candidate needs a write.

use crate::catalog::{CatalogItem, ItemAttributes, QualityBuckets, SeasonMap};
use crate::metadata::CatalogCandidate;
use crate::searcher::Release;

/// What to do with a freshly resolved candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    Skip,
    Insert,
    Update,
}

/// Full write decision once resolution has run.
///
/// Insert when nothing is stored under the candidate's key. Update when the
/// source timestamp is strictly newer than the stored one, or when a tracked
/// attribute or the structural shape of the release maps differs. Skip
/// otherwise. Transient release fields (leechers, display metadata) may
/// drift without forcing a rewrite.
pub fn should_write(existing: Option<&CatalogItem>, candidate: &CatalogItem) -> WriteDecision {
    let Some(existing) = existing else {
        return WriteDecision::Insert;
    };

    if timestamp_newer(existing, candidate)
        || attributes_differ(&existing.attributes, &candidate.attributes)
        || existing.genres != candidate.genres
        || releases_differ(existing, candidate)
    {
        return WriteDecision::Update;
    }

    WriteDecision::Skip
}

/// Cheap staleness pre-check run before any search traffic is spent. True
/// when no stored copy exists, the source timestamp moved forward, or a
/// tracked attribute changed. When false, the stored release structures are
/// left untouched and the item is skipped.
pub fn needs_refresh(existing: Option<&CatalogItem>, candidate: &CatalogCandidate) -> bool {
    let Some(existing) = existing else {
        return true;
    };

    match (existing.source_updated_at, candidate.source_updated_at) {
        (Some(stored), Some(fresh)) if fresh > stored => return true,
        (None, Some(_)) => return true,
        _ => {}
    }

    attributes_differ(&existing.attributes, &candidate.attributes)
}

fn timestamp_newer(existing: &CatalogItem, candidate: &CatalogItem) -> bool {
    match (existing.source_updated_at, candidate.source_updated_at) {
        (Some(stored), Some(fresh)) => fresh > stored,
        (None, Some(_)) => true,
        _ => false,
    }
}

/// The tracked attribute fields: synopsis, start date, average rating,
/// popularity rank, poster URL.
fn attributes_differ(a: &ItemAttributes, b: &ItemAttributes) -> bool {
    a.synopsis != b.synopsis
        || a.start_date != b.start_date
        || a.average_rating != b.average_rating
        || a.popularity_rank != b.popularity_rank
        || a.poster_url != b.poster_url
}

/// Structural comparison of the resolved release maps: season count,
/// episode count per season, release count per quality bucket, and pairwise
/// name + seeders equality. Not deep equality.
fn releases_differ(a: &CatalogItem, b: &CatalogItem) -> bool {
    season_maps_differ(&a.seasons, &b.seasons)
        || buckets_differ(&a.qualities.0, &b.qualities.0)
        || uncategorized_differ(a, b)
}

fn season_maps_differ(a: &SeasonMap, b: &SeasonMap) -> bool {
    if a.0.len() != b.0.len() {
        return true;
    }
    for ((season_a, eps_a), (season_b, eps_b)) in a.0.iter().zip(b.0.iter()) {
        if season_a != season_b || eps_a.len() != eps_b.len() {
            return true;
        }
        for ((ep_a, buckets_a), (ep_b, buckets_b)) in eps_a.iter().zip(eps_b.iter()) {
            if ep_a != ep_b || buckets_differ(buckets_a, buckets_b) {
                return true;
            }
        }
    }
    false
}

fn buckets_differ(a: &QualityBuckets, b: &QualityBuckets) -> bool {
    if a.len() != b.len() {
        return true;
    }
    a.iter()
        .zip(b.iter())
        .any(|((qa, la), (qb, lb))| qa != qb || lists_differ(la, lb))
}

fn lists_differ(a: &[Release], b: &[Release]) -> bool {
    a.len() != b.len()
        || a.iter()
            .zip(b.iter())
            .any(|(ra, rb)| ra.name != rb.name || ra.seeders != rb.seeders)
}

fn uncategorized_differ(a: &CatalogItem, b: &CatalogItem) -> bool {
    if a.uncategorized.len() != b.uncategorized.len() {
        return true;
    }
    a.uncategorized
        .0
        .iter()
        .zip(b.uncategorized.0.iter())
        .any(|((na, ra), (nb, rb))| na != nb || ra.seeders != rb.seeders)
}
