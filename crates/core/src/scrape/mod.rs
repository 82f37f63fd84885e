//! The ingestion pipeline - per-kind item scrapers and the bulk driver.
//!
//! Each content kind has a scraper that walks its provider listing, decides
//! per candidate whether a store write is due, resolves releases through the
//! torrent aggregator, and writes through the catalog store. The bulk
//! orchestrator runs all configured scrapers concurrently with bounded
//! per-item parallelism and structured cancellation.

mod anime_movies;
mod anime_shows;
mod bulk;
mod change;
mod config;
mod driver;
mod movies;
mod shows;

pub use anime_movies::AnimeMovieScraper;
pub use anime_shows::AnimeShowScraper;
pub use bulk::{BulkOrchestrator, BulkSummary, ScraperReport};
pub use change::{needs_refresh, should_write, WriteDecision};
pub use config::{DedupKey, ScrapeConfig};
pub use driver::{ItemScraper, ScrapeError, ScrapeStats, Shutdown};
pub use movies::MovieScraper;
pub use shows::ShowScraper;
