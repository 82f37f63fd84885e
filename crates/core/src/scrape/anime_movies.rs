//! Anime movie scraper - same flat quality-grouped shape as movies, with
//! the anime relevance filter.

use std::sync::Arc;

use async_trait::async_trait;

use super::config::ScrapeConfig;
use super::driver::{Driver, ItemScraper, ResolveKind, ScrapeDeps, ScrapeError, ScrapeStats, Shutdown};
use crate::catalog::{CatalogItem, CatalogStore, ContentKind};
use crate::metadata::MetadataSource;
use crate::release::ReleaseFilter;
use crate::resolver::resolve_by_quality;
use crate::searcher::{Release, TorrentSearcher};

struct AnimeMovieResolve {
    filter: ReleaseFilter,
}

#[async_trait]
impl ResolveKind for AnimeMovieResolve {
    fn kind(&self) -> ContentKind {
        ContentKind::AnimeMovie
    }

    async fn resolve(
        &self,
        deps: &ScrapeDeps,
        item: &mut CatalogItem,
        _provider_id: &str,
        releases: Vec<Release>,
    ) {
        item.qualities = resolve_by_quality(releases, &self.filter, deps.config.quality_order);
    }
}

/// Scraper for the anime movie kind.
pub struct AnimeMovieScraper {
    driver: Driver<AnimeMovieResolve>,
}

impl AnimeMovieScraper {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        searcher: Arc<dyn TorrentSearcher>,
        catalog: Arc<dyn CatalogStore>,
        config: ScrapeConfig,
    ) -> Self {
        let deps = ScrapeDeps {
            metadata,
            searcher,
            catalog,
            config,
        };
        let resolver = AnimeMovieResolve {
            filter: ReleaseFilter::for_kind(ContentKind::AnimeMovie),
        };
        Self {
            driver: Driver::new(deps, resolver),
        }
    }
}

#[async_trait]
impl ItemScraper for AnimeMovieScraper {
    fn kind(&self) -> ContentKind {
        ContentKind::AnimeMovie
    }

    async fn run(&self, shutdown: &Shutdown) -> Result<ScrapeStats, ScrapeError> {
        self.driver.run(shutdown).await
    }
}
