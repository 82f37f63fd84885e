//! Movie scraper - flat quality-grouped resolution, no episode grid.

use std::sync::Arc;

use async_trait::async_trait;

use super::config::ScrapeConfig;
use super::driver::{Driver, ItemScraper, ResolveKind, ScrapeDeps, ScrapeError, ScrapeStats, Shutdown};
use crate::catalog::{CatalogItem, CatalogStore, ContentKind};
use crate::metadata::MetadataSource;
use crate::release::ReleaseFilter;
use crate::resolver::resolve_by_quality;
use crate::searcher::{Release, TorrentSearcher};

struct MovieResolve {
    filter: ReleaseFilter,
}

#[async_trait]
impl ResolveKind for MovieResolve {
    fn kind(&self) -> ContentKind {
        ContentKind::Movie
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

/// Scraper for the movie kind.
pub struct MovieScraper {
    driver: Driver<MovieResolve>,
}

impl MovieScraper {
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
        let resolver = MovieResolve {
            filter: ReleaseFilter::for_kind(ContentKind::Movie),
        };
        Self {
            driver: Driver::new(deps, resolver),
        }
    }
}

#[async_trait]
impl ItemScraper for MovieScraper {
    fn kind(&self) -> ContentKind {
        ContentKind::Movie
    }

    async fn run(&self, shutdown: &Shutdown) -> Result<ScrapeStats, ScrapeError> {
        self.driver.run(shutdown).await
    }
}
