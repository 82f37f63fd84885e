//! Season and episode extraction from free-text release names.
//!
//! The pattern tables are ordered most-specific first and the order is
//! load-bearing: the trailing loose patterns will pair any two nearby numbers
//! (years, codec tags), so they must only run after every marker form has had
//! its chance. Each table is a single versioned artifact: changes must keep
//! the regression corpus in the tests below green.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("No season/episode pattern matched: {0}")]
    NoMatch(String),
}

/// Ordered table for two-number (season, episode) extraction.
static SEASON_EPISODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Strict marker pairs.
        r"(?i)\bs(\d{1,2})[ ._-]?e(\d{1,2})\b",
        r"(?i)\b(\d{1,2})x(\d{1,2})\b",
        r"(?i)\bseason[ ._-]*(\d{1,2})[ ._-]*episode[ ._-]*(\d{1,2})\b",
        r"(?i)\bs(\d{1,2})[ ._-]{1,3}ep[ ._-]?(\d{1,2})\b",
        // Season marker followed by a bare episode number.
        r"(?i)\bs(\d{1,2})[ ._-]{1,3}(\d{1,2})\b",
        r"(?i)\bseason[ ._-]*(\d{1,2})[^0-9]{1,3}(\d{1,2})\b",
        // CJK season/episode markers.
        r"第(\d{1,2})季[^0-9]{0,4}第(\d{1,2})[話话集]",
        // Loose fallback, kept last: it will pair unrelated numbers (years,
        // codec tags) when nothing better matched. The separator is required
        // so a single number run never splits into a degenerate pair.
        r"(\d{1,2})\D+(\d{1,2})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("season/episode pattern must compile"))
    .collect()
});

/// Ordered table for episode-only extraction on single-season content.
/// Episode numbers run up to three digits here; long-running anime exceed 99.
static EPISODE_ONLY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bs\d{1,2}[ ._-]?e(\d{1,3})\b",
        r"(?i)\b\d{1,2}x(\d{1,3})\b",
        r"(?i)\bseason[ ._-]*\d{1,2}[ ._-]*episode[ ._-]*(\d{1,3})\b",
        r"(?i)\bepisode[ ._-]*(\d{1,3})\b",
        r"(?i)\bep[ ._-]*(\d{1,3})\b",
        r"(?i)\be(\d{1,3})\b",
        r"第(\d{1,3})[話话集]",
        r"\b(\d{1,3})화",
        r" - ?(\d{1,3})\b",
        r"\[(\d{1,3})\]",
        r"\b(\d{1,3})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("episode pattern must compile"))
    .collect()
});

/// Names that cover a whole season or series instead of a single episode.
/// A bare season marker does not count: every `S01E01` name contains one.
static FULL_PACK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:complete|full)\b",
        r"(?i)\b(?:season[ ._-]?\d{1,2}|s\d{1,2})\b[ ._-]{0,3}series\b",
        r"(?i)\bseries\b[ ._-]{0,3}(?:season[ ._-]?\d{1,2}|s\d{1,2})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("full pack pattern must compile"))
    .collect()
});

/// Extract (season, episode) from a release name.
///
/// Tries each pattern in table order and returns the first pair of captured
/// integers. Fails with [`PatternError::NoMatch`] when no pattern produces
/// two captures, so a single number never makes a pair.
pub fn extract_season_episode(name: &str) -> Result<(u32, u32), PatternError> {
    for pattern in SEASON_EPISODE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(name) {
            let season = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let episode = caps.get(2).and_then(|m| m.as_str().parse().ok());
            if let (Some(season), Some(episode)) = (season, episode) {
                return Ok((season, episode));
            }
        }
    }
    Err(PatternError::NoMatch(name.to_string()))
}

/// Extract an episode number from a single-season release name.
///
/// Returns 0 when nothing matched; callers treat 0 as "unparseable", not as
/// episode zero.
pub fn extract_episode_only(name: &str) -> u32 {
    for pattern in EPISODE_ONLY_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(name) {
            if let Some(episode) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                return episode;
            }
        }
    }
    0
}

/// Whether a release name denotes a full-season or complete-series pack.
///
/// True for a standalone "complete" or "full", or a season marker combined
/// with "series" in either order. Pack releases are routed to the
/// uncategorized bucket instead of the episode grid.
pub fn is_full_pack(name: &str) -> bool {
    FULL_PACK_PATTERNS.iter().any(|p| p.is_match(name))
}
