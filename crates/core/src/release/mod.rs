//! Release name parsing and relevance filtering.
//!
//! Everything in this module is pure string work: quality tag extraction,
//! season/episode extraction from free-text release names, full-pack
//! detection, and the per-kind category filters. No I/O, no state beyond
//! lazily compiled pattern tables.

mod filter;
mod pattern;
mod quality;

pub use filter::{is_adult_content, is_unrelated_content, ReleaseFilter};
pub use pattern::{
    extract_episode_only, extract_season_episode, is_full_pack, PatternError,
};
pub use quality::{extract_quality, extract_quality_with, Quality, QualityOrder};
