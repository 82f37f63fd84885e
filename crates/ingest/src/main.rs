use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nitrate_core::{
    load_config, validate_config, AggregatorClient, AnimeMovieScraper, AnimeShowScraper,
    BulkOrchestrator, CatalogStore, ContentKind, ItemScraper, KitsuClient, MetadataSource,
    MovieScraper, SanitizedConfig, ShowScraper, SqliteCatalog, TmdbClient, TorrentSearcher,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("NITRATE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    // Create SQLite catalog store
    let catalog: Arc<dyn CatalogStore> = Arc::new(
        SqliteCatalog::new(&config.store.path).context("Failed to open catalog store")?,
    );
    info!("Catalog store initialized at {:?}", config.store.path);

    // Create torrent search client
    let searcher: Arc<dyn TorrentSearcher> =
        Arc::new(AggregatorClient::new(config.search.clone()));
    info!("Torrent aggregator client initialized ({})", config.search.base_url);

    // Create metadata clients only for the kinds the run covers
    let needs_tmdb = config
        .scrape
        .kinds
        .iter()
        .any(|k| matches!(k, ContentKind::Movie | ContentKind::Show));
    let needs_kitsu = config
        .scrape
        .kinds
        .iter()
        .any(|k| matches!(k, ContentKind::AnimeMovie | ContentKind::AnimeShow));

    let tmdb: Option<Arc<dyn MetadataSource>> = if needs_tmdb {
        let client =
            TmdbClient::new(config.tmdb.clone()).context("Failed to create TMDB client")?;
        info!("TMDB client initialized");
        Some(Arc::new(client))
    } else {
        None
    };
    let kitsu: Option<Arc<dyn MetadataSource>> = if needs_kitsu {
        let client =
            KitsuClient::new(config.kitsu.clone()).context("Failed to create Kitsu client")?;
        info!("Kitsu client initialized");
        Some(Arc::new(client))
    } else {
        None
    };

    // Build one scraper per configured kind. Iterating the canonical kind
    // list keeps the order stable and drops duplicates from the config.
    let mut scrapers: Vec<Arc<dyn ItemScraper>> = Vec::new();
    for kind in ContentKind::ALL
        .iter()
        .filter(|k| config.scrape.kinds.contains(k))
    {
        let metadata = match kind {
            ContentKind::Movie | ContentKind::Show => tmdb.clone(),
            ContentKind::AnimeMovie | ContentKind::AnimeShow => kitsu.clone(),
        }
        .context("Metadata client missing for configured kind")?;

        let scraper: Arc<dyn ItemScraper> = match kind {
            ContentKind::Movie => Arc::new(MovieScraper::new(
                metadata,
                Arc::clone(&searcher),
                Arc::clone(&catalog),
                config.scrape.clone(),
            )),
            ContentKind::Show => Arc::new(ShowScraper::new(
                metadata,
                Arc::clone(&searcher),
                Arc::clone(&catalog),
                config.scrape.clone(),
            )),
            ContentKind::AnimeMovie => Arc::new(AnimeMovieScraper::new(
                metadata,
                Arc::clone(&searcher),
                Arc::clone(&catalog),
                config.scrape.clone(),
            )),
            ContentKind::AnimeShow => Arc::new(AnimeShowScraper::new(
                metadata,
                Arc::clone(&searcher),
                Arc::clone(&catalog),
                config.scrape.clone(),
            )),
        };
        scrapers.push(scraper);
    }
    info!("Prepared {} scrapers", scrapers.len());

    let orchestrator = Arc::new(BulkOrchestrator::new(scrapers));

    // Wire Ctrl+C / SIGTERM into a cooperative stop
    let stopper = Arc::clone(&orchestrator);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping scrapers");
        stopper.request_stop();
    });

    let summary = orchestrator.run().await.context("Bulk run failed")?;

    for report in &summary.reports {
        match &report.error {
            Some(e) => error!(kind = %report.kind, error = %e, "scraper failed"),
            None => info!(
                kind = %report.kind,
                pages = report.stats.pages,
                candidates = report.stats.candidates,
                inserted = report.stats.inserted,
                updated = report.stats.updated,
                skipped = report.stats.skipped,
                failed = report.stats.failed,
                "scraper finished"
            ),
        }
    }

    let totals = summary.totals();
    info!(
        run_id = %summary.run_id,
        written = totals.written(),
        skipped = totals.skipped,
        failed = totals.failed,
        "ingest run complete"
    );

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
