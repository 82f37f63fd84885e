pub mod catalog;
pub mod config;
pub mod metadata;
pub mod release;
pub mod resolver;
pub mod scrape;
pub mod searcher;
pub mod testing;

pub use catalog::{CatalogError, CatalogItem, CatalogStore, ContentKind, SqliteCatalog};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use metadata::{KitsuClient, MetadataError, MetadataSource, TmdbClient};
pub use scrape::{
    AnimeMovieScraper, AnimeShowScraper, BulkOrchestrator, BulkSummary, ItemScraper, MovieScraper,
    ScrapeConfig, ScrapeError, ScrapeStats, ScraperReport, ShowScraper, Shutdown,
};
pub use searcher::{AggregatorClient, Release, SearchError, TorrentSearcher};
