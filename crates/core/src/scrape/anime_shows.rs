//! Anime show scraper. Anime releases carry absolute episode numbers, so
//! resolution pins everything to season 1 and the ledger backfill fills the
//! rest.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::config::ScrapeConfig;
use super::driver::{Driver, ItemScraper, ResolveKind, ScrapeDeps, ScrapeError, ScrapeStats, Shutdown};
use crate::catalog::{CatalogItem, CatalogStore, ContentKind};
use crate::metadata::MetadataSource;
use crate::release::ReleaseFilter;
use crate::resolver::{resolve_single_season, Backfiller};
use crate::searcher::{Release, TorrentSearcher};

struct AnimeShowResolve {
    filter: ReleaseFilter,
}

#[async_trait]
impl ResolveKind for AnimeShowResolve {
    fn kind(&self) -> ContentKind {
        ContentKind::AnimeShow
    }

    async fn resolve(
        &self,
        deps: &ScrapeDeps,
        item: &mut CatalogItem,
        provider_id: &str,
        releases: Vec<Release>,
    ) {
        let mut resolved = resolve_single_season(releases, &self.filter, deps.config.quality_order);

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

/// Scraper for the anime show kind.
pub struct AnimeShowScraper {
    driver: Driver<AnimeShowResolve>,
}

impl AnimeShowScraper {
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
        let resolver = AnimeShowResolve {
            filter: ReleaseFilter::for_kind(ContentKind::AnimeShow),
        };
        Self {
            driver: Driver::new(deps, resolver),
        }
    }
}

#[async_trait]
impl ItemScraper for AnimeShowScraper {
    fn kind(&self) -> ContentKind {
        ContentKind::AnimeShow
    }

    async fn run(&self, shutdown: &Shutdown) -> Result<ScrapeStats, ScrapeError> {
        self.driver.run(shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Quality;
    use crate::testing::{fixtures, MockCatalog, MockMetadata, MockSearcher};

    struct Setup {
        metadata: Arc<MockMetadata>,
        searcher: Arc<MockSearcher>,
        catalog: Arc<MockCatalog>,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                metadata: Arc::new(MockMetadata::new()),
                searcher: Arc::new(MockSearcher::new()),
                catalog: Arc::new(MockCatalog::new()),
            }
        }

        fn scraper(&self) -> AnimeShowScraper {
            AnimeShowScraper::new(
                Arc::clone(&self.metadata) as Arc<dyn MetadataSource>,
                Arc::clone(&self.searcher) as Arc<dyn TorrentSearcher>,
                Arc::clone(&self.catalog) as Arc<dyn CatalogStore>,
                ScrapeConfig::default(),
            )
        }
    }

    #[tokio::test]
    async fn test_absolute_numbering_lands_on_season_one() {
        let setup = Setup::new();
        setup
            .metadata
            .set_candidates(
                ContentKind::AnimeShow,
                vec![fixtures::candidate("44042", ContentKind::AnimeShow, "Blade Saga")],
            )
            .await;
        setup
            .searcher
            .set_results(vec![
                fixtures::anime_release("[Subs] Blade Saga - 01 [1080p]", "150"),
                fixtures::anime_release("[Subs] Blade Saga - 02 [1080p]", "120"),
                fixtures::anime_release("[Subs] Blade Saga - 02 [720p]", "30"),
                fixtures::anime_release("Blade Saga Complete Series", "400"),
            ])
            .await;

        let stats = setup.scraper().run(&Shutdown::new()).await.unwrap();

        assert_eq!(stats.inserted, 1);
        let stored = setup.catalog.find(ContentKind::AnimeShow, "Blade Saga").unwrap();
        assert!(stored.seasons.has_episode(1, 1));
        let e2 = &stored.seasons.0[&1][&2];
        assert_eq!(e2[&Quality::Hd1080].len(), 1);
        assert_eq!(e2[&Quality::Hd720].len(), 1);
        // The series pack goes to the bucket, not the grid.
        assert!(stored.uncategorized.contains_name("Blade Saga Complete Series"));
    }

    #[tokio::test]
    async fn test_ledger_gaps_are_backfilled() {
        let setup = Setup::new();
        setup
            .metadata
            .set_candidates(
                ContentKind::AnimeShow,
                vec![fixtures::candidate("44042", ContentKind::AnimeShow, "Blade Saga")],
            )
            .await;
        setup
            .metadata
            .set_episodes("44042", fixtures::episode_ledger(1, 3))
            .await;
        setup
            .searcher
            .set_query_handler(|query| {
                if query == "Blade Saga" {
                    Some(vec![fixtures::anime_release("[Subs] Blade Saga - 01 [1080p]", "150")])
                } else if query == "Blade Saga 02" {
                    // Found by the loose fallback, not the SxxExx form.
                    Some(vec![fixtures::anime_release("[Subs] Blade Saga - 02 [720p]", "25")])
                } else {
                    Some(vec![])
                }
            })
            .await;

        setup.scraper().run(&Shutdown::new()).await.unwrap();

        let queries = setup.searcher.recorded_queries().await;
        assert_eq!(
            queries,
            vec![
                "Blade Saga".to_string(),
                "Blade Saga S01E02".to_string(),
                "Blade Saga 02".to_string(),
                "Blade Saga S01E03".to_string(),
                "Blade Saga 03".to_string(),
            ]
        );

        let stored = setup.catalog.find(ContentKind::AnimeShow, "Blade Saga").unwrap();
        assert!(stored.seasons.has_episode(1, 1));
        assert!(stored.seasons.has_episode(1, 2));
        assert!(!stored.seasons.has_episode(1, 3));
    }

    #[tokio::test]
    async fn test_unnumbered_release_goes_to_bucket() {
        let setup = Setup::new();
        setup
            .metadata
            .set_candidates(
                ContentKind::AnimeShow,
                vec![fixtures::candidate("1", ContentKind::AnimeShow, "Blade Saga")],
            )
            .await;
        setup
            .searcher
            .set_results(vec![
                fixtures::anime_release("[Subs] Blade Saga - 01 [1080p]", "150"),
                fixtures::anime_release("Blade Saga The Movie Special", "60"),
            ])
            .await;

        setup.scraper().run(&Shutdown::new()).await.unwrap();

        let stored = setup.catalog.find(ContentKind::AnimeShow, "Blade Saga").unwrap();
        assert!(stored.seasons.has_episode(1, 1));
        assert_eq!(stored.seasons.release_count(), 1);
        assert!(stored.uncategorized.contains_name("Blade Saga The Movie Special"));
    }
}
