//! Shared scraper machinery - the page walk, the bounded worker pool, and
//! the per-candidate pipeline the four kind scrapers plug into.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::{broadcast, Semaphore};
use tracing::{debug, info, warn};

use super::change::{self, WriteDecision};
use super::config::ScrapeConfig;
use crate::catalog::{CatalogError, CatalogItem, CatalogStore, ContentKind};
use crate::metadata::{CatalogCandidate, MetadataError, MetadataSource};
use crate::searcher::{Release, SearchError, TorrentSearcher};

/// Errors surfaced past a scraper boundary. Everything item-scoped is logged
/// and absorbed before reaching these.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Metadata source error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Torrent search error: {0}")]
    Search(#[from] SearchError),

    #[error("Catalog storage error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Bulk run failed: {0}")]
    TotalFailure(String),

    #[error("A bulk run is already in progress")]
    AlreadyRunning,
}

/// Per-scraper run tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    pub pages: u64,
    pub candidates: u64,
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl ScrapeStats {
    pub fn written(&self) -> u64 {
        self.inserted + self.updated
    }

    pub fn merge(&mut self, other: &ScrapeStats) {
        self.pages += other.pages;
        self.candidates += other.candidates;
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Inserted => self.inserted += 1,
            ItemOutcome::Updated => self.updated += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Inserted,
    Updated,
    Skipped,
    Failed,
}

/// Cooperative shutdown signal shared by the orchestrator and its scrapers.
///
/// Scrapers check the flag between pages and before dispatching each item;
/// in-flight network calls finish or time out naturally.
#[derive(Debug, Clone)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            tx,
        }
    }

    /// Flip the flag and wake anything waiting on [`Shutdown::notified`].
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _ = self.tx.send(());
    }

    pub fn requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// A receiver that resolves once shutdown is requested.
    pub fn notified(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One content kind's scraper, runnable by the bulk orchestrator.
#[async_trait]
pub trait ItemScraper: Send + Sync {
    fn kind(&self) -> ContentKind;

    /// Walk the provider listing to exhaustion (or shutdown), processing
    /// candidates through the bounded worker pool. Returns the run tally;
    /// errors only on a fatal, non-item-scoped failure.
    async fn run(&self, shutdown: &Shutdown) -> Result<ScrapeStats, ScrapeError>;
}

/// Shared dependencies handed to every kind scraper.
pub(crate) struct ScrapeDeps {
    pub metadata: Arc<dyn MetadataSource>,
    pub searcher: Arc<dyn TorrentSearcher>,
    pub catalog: Arc<dyn CatalogStore>,
    pub config: ScrapeConfig,
}

/// The kind-specific half of the pipeline: which filter applies and how
/// search results become release structures on the item.
#[async_trait]
pub(crate) trait ResolveKind: Send + Sync {
    fn kind(&self) -> ContentKind;

    /// Fill the item's release structures from the broad search results.
    /// For serialized kinds this also fetches the episode ledger and runs
    /// the backfill pass.
    async fn resolve(
        &self,
        deps: &ScrapeDeps,
        item: &mut CatalogItem,
        provider_id: &str,
        releases: Vec<Release>,
    );
}

/// Drives one kind's listing walk and fan-out. Kind scrapers delegate their
/// whole `run` to this.
pub(crate) struct Driver<R: ResolveKind> {
    deps: ScrapeDeps,
    resolver: R,
    /// Keys currently being processed. At most one worker per catalog key
    /// is in flight; a repeated candidate on the same page is skipped.
    in_flight: Mutex<HashSet<String>>,
}

impl<R: ResolveKind> Driver<R> {
    pub fn new(deps: ScrapeDeps, resolver: R) -> Self {
        Self {
            deps,
            resolver,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub async fn run(&self, shutdown: &Shutdown) -> Result<ScrapeStats, ScrapeError> {
        let kind = self.resolver.kind();
        let semaphore = Arc::new(Semaphore::new(self.deps.config.max_concurrent_items));
        let mut stats = ScrapeStats::default();
        let mut cursor: Option<String> = None;
        let mut first_page = true;

        loop {
            if shutdown.requested() {
                info!(kind = %kind, "shutdown requested, ending listing walk");
                break;
            }

            let page = match self.deps.metadata.list_page(kind, cursor.take()).await {
                Ok(page) => page,
                Err(e) if first_page => {
                    // No page was ever fetched: this kind produced nothing
                    // at all, which is fatal for the scraper.
                    return Err(e.into());
                }
                Err(e) => {
                    warn!(kind = %kind, error = %e, "listing page fetch failed, ending walk");
                    break;
                }
            };
            first_page = false;
            stats.pages += 1;

            let is_last = page.is_last();
            cursor = page.next;

            let workers = page.items.into_iter().map(|candidate| {
                let semaphore = Arc::clone(&semaphore);
                async move {
                    // Acquire never fails here: the semaphore is never closed.
                    let _permit = semaphore.acquire().await.expect("semaphore closed");
                    if shutdown.requested() {
                        return ItemOutcome::Skipped;
                    }
                    self.process_candidate(candidate).await
                }
            });

            for outcome in join_all(workers).await {
                stats.candidates += 1;
                stats.record(outcome);
            }

            if is_last {
                break;
            }
        }

        info!(
            kind = %kind,
            pages = stats.pages,
            candidates = stats.candidates,
            inserted = stats.inserted,
            updated = stats.updated,
            skipped = stats.skipped,
            failed = stats.failed,
            "scraper run finished"
        );
        Ok(stats)
    }

    async fn process_candidate(&self, candidate: CatalogCandidate) -> ItemOutcome {
        let kind = self.resolver.kind();
        if candidate.title.trim().is_empty() {
            debug!(kind = %kind, provider_id = %candidate.provider_id, "skipping empty-title candidate");
            return ItemOutcome::Skipped;
        }

        let key = self.deps.config.dedup_key.key_for(&candidate);
        if !self.in_flight.lock().unwrap().insert(key.clone()) {
            debug!(kind = %kind, key = %key, "key already in flight, skipping");
            return ItemOutcome::Skipped;
        }

        let outcome = self.process_keyed(&candidate, &key).await;
        self.in_flight.lock().unwrap().remove(&key);
        outcome
    }

    async fn process_keyed(&self, candidate: &CatalogCandidate, key: &str) -> ItemOutcome {
        let kind = self.resolver.kind();
        let title = candidate.title.trim();

        let existing = match self.deps.catalog.find(kind, key) {
            Ok(item) => Some(item),
            Err(CatalogError::NotFound(_)) => None,
            Err(e) => {
                warn!(kind = %kind, key = %key, error = %e, "catalog lookup failed");
                return ItemOutcome::Failed;
            }
        };

        if !change::needs_refresh(existing.as_ref(), candidate) {
            debug!(kind = %kind, key = %key, "item unchanged, skipping");
            return ItemOutcome::Skipped;
        }

        let mut item = CatalogItem::new(key, kind, title);
        item.attributes = candidate.attributes.clone();
        item.source_updated_at = candidate.source_updated_at;

        if let Some(ref genre_ref) = candidate.genre_ref {
            match self.deps.metadata.fetch_genres(genre_ref).await {
                Ok(genres) => item.genres = genres,
                Err(e) => {
                    warn!(kind = %kind, title = title, error = %e, "genre fetch failed, continuing without genres");
                }
            }
        }

        let releases = match self.deps.searcher.search(title).await {
            Ok(releases) => releases,
            Err(e) => {
                warn!(kind = %kind, title = title, error = %e, "torrent search failed, skipping item");
                return ItemOutcome::Failed;
            }
        };

        self.resolver
            .resolve(&self.deps, &mut item, &candidate.provider_id, releases)
            .await;

        if !item.has_releases() {
            match existing {
                Some(ref stored) => {
                    // Metadata-only refresh: never clobber resolved data
                    // with an empty search result.
                    item.seasons = stored.seasons.clone();
                    item.qualities = stored.qualities.clone();
                    item.uncategorized = stored.uncategorized.clone();
                }
                None if !self.deps.config.persist_without_releases => {
                    debug!(kind = %kind, title = title, "no releases resolved, not inserting");
                    return ItemOutcome::Skipped;
                }
                None => {}
            }
        }

        match change::should_write(existing.as_ref(), &item) {
            WriteDecision::Skip => ItemOutcome::Skipped,
            WriteDecision::Insert => match self.deps.catalog.insert(&item) {
                Ok(()) => {
                    info!(kind = %kind, key = %key, title = title, "catalog item inserted");
                    ItemOutcome::Inserted
                }
                Err(e) => {
                    warn!(kind = %kind, key = %key, error = %e, "catalog insert failed");
                    ItemOutcome::Failed
                }
            },
            WriteDecision::Update => match self.deps.catalog.update(&item) {
                Ok(()) => {
                    info!(kind = %kind, key = %key, title = title, "catalog item updated");
                    ItemOutcome::Updated
                }
                Err(e) => {
                    warn!(kind = %kind, key = %key, error = %e, "catalog update failed");
                    ItemOutcome::Failed
                }
            },
        }
    }
}
