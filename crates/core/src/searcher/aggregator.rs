//! HTTP client for the torrent-search aggregator.
//!
//! The aggregator exposes a single search endpoint returning a flat JSON
//! list of releases across its upstream indexers. One query, one page; the
//! engine never paginates here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Release, SearchError, TorrentSearcher};
use crate::config::SearchConfig;

/// Client for the aggregator's `/search` endpoint.
pub struct AggregatorClient {
    client: Client,
    config: SearchConfig,
}

impl AggregatorClient {
    pub fn new(config: SearchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn build_search_url(&self, query: &str) -> String {
        format!(
            "{}/search?query={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }
}

/// Wire shape of the aggregator response. Fields beyond `data` (timing,
/// totals) are ignored.
#[derive(Debug, Deserialize)]
struct AggregatorResponse {
    #[serde(default)]
    data: Vec<Release>,
}

#[async_trait]
impl TorrentSearcher for AggregatorClient {
    fn name(&self) -> &str {
        "aggregator"
    }

    async fn search(&self, query: &str) -> Result<Vec<Release>, SearchError> {
        let url = self.build_search_url(query);
        debug!(query = query, "searching torrent aggregator");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout(self.config.timeout_secs)
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ApiError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: AggregatorResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        debug!(
            query = query,
            results = parsed.data.len(),
            "aggregator search completed"
        );

        Ok(parsed.data)
    }
}
