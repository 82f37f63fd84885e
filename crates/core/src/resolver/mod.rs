//! Release resolution - placing search results onto catalog structures.
//!
//! Categorization turns a flat search result list into the per-kind release
//! structures. Backfill walks the episode ledger afterwards and runs
//! targeted searches for the slots the broad search missed.

mod backfill;
mod categorize;

pub use backfill::{missing_episodes, Backfiller};
pub use categorize::{resolve_by_quality, resolve_seasoned, resolve_single_season, Resolved};
