//! Show scraper - seasoned resolution against the provider's episode
//! ledger, with a backfill pass for the gaps the broad search missed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::config::ScrapeConfig;
use super::driver::{Driver, ItemScraper, ResolveKind, ScrapeDeps, ScrapeError, ScrapeStats, Shutdown};
use crate::catalog::{CatalogItem, CatalogStore, ContentKind};
use crate::metadata::MetadataSource;
use crate::release::ReleaseFilter;
use crate::resolver::{resolve_seasoned, Backfiller};
use crate::searcher::{Release, TorrentSearcher};

struct ShowResolve {
    filter: ReleaseFilter,
}

#[async_trait]
impl ResolveKind for ShowResolve {
    fn kind(&self) -> ContentKind {
        ContentKind::Show
    }

    async fn resolve(
        &self,
        deps: &ScrapeDeps,
        item: &mut CatalogItem,
        provider_id: &str,
        releases: Vec<Release>,
    ) {
        let mut resolved = resolve_seasoned(releases, &self.filter, deps.config.quality_order);

        // A ledger fetch failure only costs the backfill pass.
        let ledger = match deps.metadata.fetch_episodes(provider_id).await {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(title = %item.title, error = %e, "episode ledger fetch failed, skipping backfill");
                Vec::new()
            }
        };

        if !ledger.is_empty() {
            let backfiller = Backfiller::new(
                deps.searcher.as_ref(),
                &self.filter,
                deps.config.quality_order,
            );
            backfiller.fill(&item.title, &mut resolved, &ledger).await;
        }

        item.seasons = resolved.seasons;
        item.uncategorized = resolved.uncategorized;
    }
}

/// Scraper for the show kind.
pub struct ShowScraper {
    driver: Driver<ShowResolve>,
}

impl ShowScraper {
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
        let resolver = ShowResolve {
            filter: ReleaseFilter::for_kind(ContentKind::Show),
        };
        Self {
            driver: Driver::new(deps, resolver),
        }
    }
}

#[async_trait]
impl ItemScraper for ShowScraper {
    fn kind(&self) -> ContentKind {
        ContentKind::Show
    }

    async fn run(&self, shutdown: &Shutdown) -> Result<ScrapeStats, ScrapeError> {
        self.driver.run(shutdown).await
    }
}
