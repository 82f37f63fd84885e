//! Mock searcher for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::searcher::{Release, SearchError, TorrentSearcher};

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<Release>> + Send + Sync>;

/// Mock implementation of the [`TorrentSearcher`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable result lists
/// - Track search queries for assertions
/// - Simulate failures per query
///
/// # Example
///
/// ```rust,ignore
/// use nitrate_core::testing::{fixtures, MockSearcher};
///
/// let searcher = MockSearcher::new();
/// searcher
///     .set_results(vec![fixtures::release("Show.S01E01.1080p", "40")])
///     .await;
///
/// let releases = searcher.search("show").await?;
/// assert_eq!(releases.len(), 1);
/// assert_eq!(searcher.recorded_queries().await, vec!["show"]);
/// ```
pub struct MockSearcher {
    /// Configured results to return.
    results: Arc<RwLock<Vec<Release>>>,
    /// Recorded search queries.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchError>>>,
    /// Query handler for dynamic result generation based on the query string.
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl std::fmt::Debug for MockSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSearcher")
            .field("results", &"<results>")
            .field("queries", &"<queries>")
            .field("next_error", &"<next_error>")
            .field("query_handler", &"<handler>")
            .finish()
    }
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    /// Create a new mock searcher with empty results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            query_handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock searcher with predefined results.
    pub fn with_results(results: Vec<Release>) -> Self {
        let searcher = Self::new();
        *searcher.results.blocking_write() = results;
        searcher
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<Release>) {
        *self.results.write().await = results;
    }

    /// Add a single result.
    pub async fn add_result(&self, result: Release) {
        self.results.write().await.push(result);
    }

    /// Get recorded search queries in call order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set a handler that generates results per query string.
    ///
    /// Useful for fallback scenarios where different queries should see
    /// different results. Returning `None` falls through to the configured
    /// result list.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<Release>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Clear the query handler.
    pub async fn clear_query_handler(&self) {
        *self.query_handler.write().await = None;
    }

    async fn take_error(&self) -> Option<SearchError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl TorrentSearcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<Release>, SearchError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.queries.write().await.push(query.to_string());

        let handler = self.query_handler.read().await;
        if let Some(ref h) = *handler {
            if let Some(results) = h(query) {
                return Ok(results);
            }
        }
        drop(handler);

        // Default behavior: every whitespace-separated query word must
        // appear in the release name, case-insensitive.
        let query_lower = query.to_lowercase();
        let results = self
            .results
            .read()
            .await
            .iter()
            .filter(|r| {
                let name = r.name.to_lowercase();
                query_lower.is_empty()
                    || query_lower.split_whitespace().all(|word| name.contains(word))
            })
            .cloned()
            .collect();

        Ok(results)
    }
}
