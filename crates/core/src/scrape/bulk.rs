//! Bulk orchestration: run every configured kind scraper concurrently under
//! one run id and fold their tallies into a summary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::driver::{ItemScraper, ScrapeError, ScrapeStats, Shutdown};
use crate::catalog::ContentKind;

/// One scraper's result inside a bulk run.
#[derive(Debug, Clone)]
pub struct ScraperReport {
    pub kind: ContentKind,
    pub stats: ScrapeStats,
    /// Set when the scraper ended with a fatal error instead of a tally.
    pub error: Option<String>,
}

/// Outcome of a whole bulk run.
#[derive(Debug, Clone)]
pub struct BulkSummary {
    pub run_id: String,
    pub reports: Vec<ScraperReport>,
}

impl BulkSummary {
    /// Tallies folded across every scraper that finished.
    pub fn totals(&self) -> ScrapeStats {
        let mut totals = ScrapeStats::default();
        for report in &self.reports {
            totals.merge(&report.stats);
        }
        totals
    }

    pub fn failed_kinds(&self) -> Vec<ContentKind> {
        self.reports
            .iter()
            .filter(|r| r.error.is_some())
            .map(|r| r.kind)
            .collect()
    }
}

/// Runs the kind scrapers as one unit.
///
/// A run fans every scraper out on its own task and waits for all of them;
/// individual scraper failures are reported, and the run as a whole fails
/// only when no scraper produced anything. At most one run is in flight at a
/// time.
pub struct BulkOrchestrator {
    scrapers: Vec<Arc<dyn ItemScraper>>,
    shutdown: Shutdown,
    running: AtomicBool,
}

impl BulkOrchestrator {
    pub fn new(scrapers: Vec<Arc<dyn ItemScraper>>) -> Self {
        Self {
            scrapers,
            shutdown: Shutdown::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Ask the in-flight run (if any) to wind down. Scrapers stop at the
    /// next page or item boundary.
    pub fn request_stop(&self) {
        self.shutdown.request();
    }

    /// The shutdown signal shared with the scrapers, for wiring into an
    /// external signal handler.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run every scraper to completion and return the summary.
    pub async fn run(&self) -> Result<BulkSummary, ScrapeError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ScrapeError::AlreadyRunning);
        }

        let result = self.run_locked().await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    async fn run_locked(&self) -> Result<BulkSummary, ScrapeError> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("bulk_run", run_id = %run_id);
        let task_span = span.clone();
        self.run_reporting(run_id, task_span).instrument(span).await
    }

    async fn run_reporting(
        &self,
        run_id: String,
        task_span: tracing::Span,
    ) -> Result<BulkSummary, ScrapeError> {
        info!(scrapers = self.scrapers.len(), "bulk run started");

        let handles: Vec<_> = self
            .scrapers
            .iter()
            .map(|scraper| {
                let scraper = Arc::clone(scraper);
                let shutdown = self.shutdown.clone();
                let task = async move {
                    let kind = scraper.kind();
                    (kind, scraper.run(&shutdown).await)
                };
                tokio::spawn(task.instrument(task_span.clone()))
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            let report = match joined {
                Ok((kind, Ok(stats))) => ScraperReport {
                    kind,
                    stats,
                    error: None,
                },
                Ok((kind, Err(e))) => {
                    error!(kind = %kind, error = %e, "scraper failed");
                    ScraperReport {
                        kind,
                        stats: ScrapeStats::default(),
                        error: Some(e.to_string()),
                    }
                }
                Err(e) => {
                    let kind = self.scrapers[index].kind();
                    error!(kind = %kind, error = %e, "scraper task panicked");
                    ScraperReport {
                        kind,
                        stats: ScrapeStats::default(),
                        error: Some(e.to_string()),
                    }
                }
            };
            reports.push(report);
        }

        if !reports.is_empty() && reports.iter().all(|r| r.error.is_some()) {
            return Err(ScrapeError::TotalFailure(format!(
                "all {} scrapers failed",
                reports.len()
            )));
        }

        let summary = BulkSummary { run_id, reports };
        let totals = summary.totals();
        info!(
            candidates = totals.candidates,
            inserted = totals.inserted,
            updated = totals.updated,
            skipped = totals.skipped,
            failed = totals.failed,
            "bulk run finished"
        );
        Ok(summary)
    }
}
