//! Mock metadata source for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::ContentKind;
use crate::metadata::{CandidatePage, CatalogCandidate, EpisodeInfo, MetadataError, MetadataSource};

/// Mock implementation of the [`MetadataSource`] trait.
///
/// Listings are configured as a vector of pages per kind; the cursor is the
/// page index as text, matching how the real providers walk their listings.
pub struct MockMetadata {
    pages: Arc<RwLock<HashMap<ContentKind, Vec<Vec<CatalogCandidate>>>>>,
    episodes: Arc<RwLock<HashMap<String, Vec<EpisodeInfo>>>>,
    genres: Arc<RwLock<HashMap<String, Vec<String>>>>,
    /// If set, the next provider call fails with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
    /// If set, the next episode-ledger fetch fails with this error. Lets
    /// tests fail the ledger lookup without touching the listing walk.
    next_episodes_error: Arc<RwLock<Option<MetadataError>>>,
    list_calls: Arc<RwLock<Vec<(ContentKind, Option<String>)>>>,
}

impl std::fmt::Debug for MockMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockMetadata")
            .field("pages", &"<pages>")
            .field("episodes", &"<episodes>")
            .field("genres", &"<genres>")
            .finish()
    }
}

impl Default for MockMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMetadata {
    /// Create a new mock with no listings configured.
    pub fn new() -> Self {
        Self {
            pages: Arc::new(RwLock::new(HashMap::new())),
            episodes: Arc::new(RwLock::new(HashMap::new())),
            genres: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            next_episodes_error: Arc::new(RwLock::new(None)),
            list_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Configure the listing pages returned for a kind.
    pub async fn set_pages(&self, kind: ContentKind, pages: Vec<Vec<CatalogCandidate>>) {
        self.pages.write().await.insert(kind, pages);
    }

    /// Configure a single listing page for a kind.
    pub async fn set_candidates(&self, kind: ContentKind, candidates: Vec<CatalogCandidate>) {
        self.set_pages(kind, vec![candidates]).await;
    }

    /// Configure the episode ledger for a provider id.
    pub async fn set_episodes(&self, provider_id: &str, ledger: Vec<EpisodeInfo>) {
        self.episodes
            .write()
            .await
            .insert(provider_id.to_string(), ledger);
    }

    /// Configure genre names for a genre reference.
    pub async fn set_genres(&self, genre_ref: &str, names: Vec<String>) {
        self.genres
            .write()
            .await
            .insert(genre_ref.to_string(), names);
    }

    /// Configure the next provider call to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next episode-ledger fetch to fail with the given error.
    pub async fn set_next_episodes_error(&self, error: MetadataError) {
        *self.next_episodes_error.write().await = Some(error);
    }

    /// Listing calls made so far, with the cursor each one carried.
    pub async fn recorded_list_calls(&self) -> Vec<(ContentKind, Option<String>)> {
        self.list_calls.read().await.clone()
    }

    async fn take_error(&self) -> Option<MetadataError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MetadataSource for MockMetadata {
    fn name(&self) -> &str {
        "mock-metadata"
    }

    async fn list_page(
        &self,
        kind: ContentKind,
        cursor: Option<String>,
    ) -> Result<CandidatePage, MetadataError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.list_calls.write().await.push((kind, cursor.clone()));

        let index: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let pages = self.pages.read().await;
        let kind_pages = pages.get(&kind).cloned().unwrap_or_default();

        let items = kind_pages.get(index).cloned().unwrap_or_default();
        let next = if index + 1 < kind_pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(CandidatePage { items, next })
    }

    async fn fetch_episodes(&self, key: &str) -> Result<Vec<EpisodeInfo>, MetadataError> {
        if let Some(err) = self.next_episodes_error.write().await.take() {
            return Err(err);
        }
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .episodes
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_genres(&self, genre_ref: &str) -> Result<Vec<String>, MetadataError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .genres
            .read()
            .await
            .get(genre_ref)
            .cloned()
            .unwrap_or_default())
    }
}
