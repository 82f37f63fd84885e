//! Bulk orchestrator integration tests.
//!
//! These drive all four kind scrapers through one orchestrated run against
//! a shared SQLite catalog, with per-kind mocked providers.

use std::sync::Arc;

use tempfile::TempDir;

use nitrate_core::{
    metadata::MetadataError,
    testing::{fixtures, MockMetadata, MockSearcher},
    AnimeMovieScraper, AnimeShowScraper, BulkOrchestrator, CatalogStore, ContentKind, ItemScraper,
    MetadataSource, MovieScraper, ScrapeConfig, ScrapeError, ShowScraper, SqliteCatalog,
    TorrentSearcher,
};

struct TestHarness {
    tmdb: Arc<MockMetadata>,
    kitsu: Arc<MockMetadata>,
    searcher: Arc<MockSearcher>,
    catalog: Arc<SqliteCatalog>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let catalog = Arc::new(SqliteCatalog::new(&db_path).expect("Failed to create catalog"));

        Self {
            tmdb: Arc::new(MockMetadata::new()),
            kitsu: Arc::new(MockMetadata::new()),
            searcher: Arc::new(MockSearcher::new()),
            catalog,
            _temp_dir: temp_dir,
        }
    }

    fn orchestrator(&self) -> BulkOrchestrator {
        let config = ScrapeConfig::default();
        let scrapers: Vec<Arc<dyn ItemScraper>> = vec![
            Arc::new(MovieScraper::new(
                Arc::clone(&self.tmdb) as Arc<dyn MetadataSource>,
                Arc::clone(&self.searcher) as Arc<dyn TorrentSearcher>,
                Arc::clone(&self.catalog) as Arc<dyn CatalogStore>,
                config.clone(),
            )),
            Arc::new(ShowScraper::new(
                Arc::clone(&self.tmdb) as Arc<dyn MetadataSource>,
                Arc::clone(&self.searcher) as Arc<dyn TorrentSearcher>,
                Arc::clone(&self.catalog) as Arc<dyn CatalogStore>,
                config.clone(),
            )),
            Arc::new(AnimeMovieScraper::new(
                Arc::clone(&self.kitsu) as Arc<dyn MetadataSource>,
                Arc::clone(&self.searcher) as Arc<dyn TorrentSearcher>,
                Arc::clone(&self.catalog) as Arc<dyn CatalogStore>,
                config.clone(),
            )),
            Arc::new(AnimeShowScraper::new(
                Arc::clone(&self.kitsu) as Arc<dyn MetadataSource>,
                Arc::clone(&self.searcher) as Arc<dyn TorrentSearcher>,
                Arc::clone(&self.catalog) as Arc<dyn CatalogStore>,
                config,
            )),
        ];
        BulkOrchestrator::new(scrapers)
    }

    async fn seed_all_kinds(&self) {
        self.tmdb
            .set_candidates(
                ContentKind::Movie,
                vec![fixtures::candidate("1", ContentKind::Movie, "Some Film")],
            )
            .await;
        self.tmdb
            .set_candidates(
                ContentKind::Show,
                vec![fixtures::candidate("2", ContentKind::Show, "Some Show")],
            )
            .await;
        self.kitsu
            .set_candidates(
                ContentKind::AnimeMovie,
                vec![fixtures::candidate("3", ContentKind::AnimeMovie, "Some Anime Film")],
            )
            .await;
        self.kitsu
            .set_candidates(
                ContentKind::AnimeShow,
                vec![fixtures::candidate("4", ContentKind::AnimeShow, "Some Anime")],
            )
            .await;

        self.searcher
            .set_query_handler(|query| {
                Some(match query {
                    "Some Film" => vec![fixtures::movie_release("Some.Film.1080p", "20")],
                    "Some Show" => vec![fixtures::release("Some.Show.S01E01.1080p", "30")],
                    "Some Anime Film" => {
                        vec![fixtures::anime_release("Some Anime Film [1080p]", "40")]
                    }
                    "Some Anime" => vec![fixtures::anime_release("Some Anime - 01 [720p]", "50")],
                    _ => vec![],
                })
            })
            .await;
    }
}

#[tokio::test]
async fn test_bulk_run_covers_all_kinds() {
    let harness = TestHarness::new();
    harness.seed_all_kinds().await;

    let summary = harness.orchestrator().run().await.expect("bulk run failed");

    assert_eq!(summary.reports.len(), 4);
    assert!(summary.failed_kinds().is_empty());
    assert_eq!(summary.totals().inserted, 4);

    for kind in ContentKind::ALL {
        assert_eq!(
            harness.catalog.count(kind).unwrap(),
            1,
            "missing item for {}",
            kind
        );
    }
}

#[tokio::test]
async fn test_one_provider_down_does_not_sink_the_run() {
    let harness = TestHarness::new();
    harness.seed_all_kinds().await;

    // Kitsu's next listing call fails, taking down exactly one anime
    // scraper. The one-shot error goes to whichever anime scraper lists
    // first, so only kind-agnostic outcomes are asserted.
    harness
        .kitsu
        .set_next_error(MetadataError::RateLimited)
        .await;

    let summary = harness.orchestrator().run().await.expect("bulk run failed");

    assert_eq!(summary.failed_kinds().len(), 1);
    assert_eq!(summary.totals().inserted, 3);
    // The TMDB kinds are unaffected.
    assert_eq!(harness.catalog.count(ContentKind::Movie).unwrap(), 1);
    assert_eq!(harness.catalog.count(ContentKind::Show).unwrap(), 1);
}

#[tokio::test]
async fn test_all_providers_down_fails_the_run() {
    let harness = TestHarness::new();
    harness.seed_all_kinds().await;

    // Every kind's first listing page fails.
    let tmdb = Arc::new(MockMetadata::new());
    let kitsu = Arc::new(MockMetadata::new());
    let scrapers: Vec<Arc<dyn ItemScraper>> = vec![
        Arc::new(MovieScraper::new(
            Arc::clone(&tmdb) as Arc<dyn MetadataSource>,
            Arc::clone(&harness.searcher) as Arc<dyn TorrentSearcher>,
            Arc::clone(&harness.catalog) as Arc<dyn CatalogStore>,
            ScrapeConfig::default(),
        )),
        Arc::new(AnimeShowScraper::new(
            Arc::clone(&kitsu) as Arc<dyn MetadataSource>,
            Arc::clone(&harness.searcher) as Arc<dyn TorrentSearcher>,
            Arc::clone(&harness.catalog) as Arc<dyn CatalogStore>,
            ScrapeConfig::default(),
        )),
    ];
    tmdb.set_next_error(MetadataError::RateLimited).await;
    kitsu.set_next_error(MetadataError::RateLimited).await;

    let result = BulkOrchestrator::new(scrapers).run().await;
    assert!(matches!(result, Err(ScrapeError::TotalFailure(_))));
}

#[tokio::test]
async fn test_stop_before_run_processes_nothing() {
    let harness = TestHarness::new();
    harness.seed_all_kinds().await;

    let orchestrator = harness.orchestrator();
    orchestrator.request_stop();

    let summary = orchestrator.run().await.expect("bulk run failed");

    assert_eq!(summary.totals().candidates, 0);
    for kind in ContentKind::ALL {
        assert_eq!(harness.catalog.count(kind).unwrap(), 0);
    }
}
