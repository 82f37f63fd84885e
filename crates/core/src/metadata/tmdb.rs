//! TMDB (The Movie Database) API client.
//!
//! Serves the movie and show kinds. Listings come from the popular
//! endpoints, paged by number. Genre tables are fetched once per media type
//! and cached for the life of the client.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::{CandidatePage, CatalogCandidate, EpisodeInfo};
use super::{MetadataError, MetadataSource};
use crate::catalog::{ContentKind, ItemAttributes};
use crate::config::TmdbConfig;

/// TMDB popular listings have a fixed page size.
const PAGE_SIZE: i64 = 20;

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
    genre_tables: Mutex<HashMap<String, HashMap<u32, String>>>,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            genre_tables: Mutex::new(HashMap::new()),
        })
    }

    fn media_type(kind: ContentKind) -> Result<&'static str, MetadataError> {
        match kind {
            ContentKind::Movie => Ok("movie"),
            ContentKind::Show => Ok("tv"),
            other => Err(MetadataError::UnsupportedKind(other)),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MetadataError> {
        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(MetadataError::RateLimited);
        }
        if status == 404 {
            return Err(MetadataError::NotFound(response.url().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(response)
    }

    fn candidate_from_entry(
        &self,
        kind: ContentKind,
        media: &str,
        entry: TmdbListEntry,
        rank: i64,
    ) -> Option<CatalogCandidate> {
        let title = entry.title.or(entry.name).unwrap_or_default();
        if title.is_empty() {
            debug!(id = entry.id, "Skipping TMDB entry without a title");
            return None;
        }

        let attributes = ItemAttributes {
            synopsis: entry.overview.unwrap_or_default(),
            start_date: entry.release_date.or(entry.first_air_date),
            average_rating: entry.vote_average.map(|v| format!("{:.1}", v)),
            popularity_rank: Some(rank),
            rating_rank: None,
            poster_url: entry
                .poster_path
                .map(|p| format!("{}{}", self.config.image_base_url, p)),
            backdrop_url: entry
                .backdrop_path
                .map(|p| format!("{}{}", self.config.image_base_url, p)),
            status: None,
            episode_count: None,
        };

        let genre_ref = if entry.genre_ids.is_empty() {
            None
        } else {
            let ids: Vec<String> = entry.genre_ids.iter().map(|id| id.to_string()).collect();
            Some(format!("{}:{}", media, ids.join(",")))
        };

        Some(CatalogCandidate {
            provider_id: entry.id.to_string(),
            kind,
            title,
            attributes,
            genre_ref,
            source_updated_at: None,
        })
    }

    async fn genre_table(&self, media: &str) -> Result<HashMap<u32, String>, MetadataError> {
        if let Some(table) = self.genre_tables.lock().unwrap().get(media) {
            return Ok(table.clone());
        }

        let url = self.endpoint(&format!("/genre/{}/list", media));
        debug!(media, "Fetching TMDB genre table");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let listing: TmdbGenreListing = response.json().await.map_err(|e| {
            MetadataError::Decode(format!("Failed to parse genre list response: {}", e))
        })?;

        let table: HashMap<u32, String> = listing
            .genres
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        self.genre_tables
            .lock()
            .unwrap()
            .insert(media.to_string(), table.clone());

        Ok(table)
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn list_page(
        &self,
        kind: ContentKind,
        cursor: Option<String>,
    ) -> Result<CandidatePage, MetadataError> {
        let media = Self::media_type(kind)?;
        let page: u32 = match cursor {
            Some(raw) => raw
                .parse()
                .map_err(|_| MetadataError::Decode(format!("Bad page cursor: {}", raw)))?,
            None => 1,
        };

        let url = self.endpoint(&format!("/{}/popular", media));
        debug!(media, page, "Fetching TMDB popular listing");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let listing: TmdbListing = response.json().await.map_err(|e| {
            MetadataError::Decode(format!("Failed to parse popular listing: {}", e))
        })?;

        let mut items = Vec::with_capacity(listing.results.len());
        for (index, entry) in listing.results.into_iter().enumerate() {
            // Rank on the popular listing, consistent across pages.
            let rank = (listing.page as i64 - 1) * PAGE_SIZE + index as i64 + 1;
            if let Some(candidate) = self.candidate_from_entry(kind, media, entry, rank) {
                items.push(candidate);
            }
        }

        let next = next_cursor(listing.page, listing.total_pages, items.len());
        Ok(CandidatePage { items, next })
    }

    async fn fetch_episodes(&self, key: &str) -> Result<Vec<EpisodeInfo>, MetadataError> {
        let url = self.endpoint(&format!("/tv/{}", key));
        debug!(id = key, "Fetching TMDB series detail");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let details: TmdbSeriesDetails = response.json().await.map_err(|e| {
            MetadataError::Decode(format!("Failed to parse series detail response: {}", e))
        })?;

        Ok(expand_episode_ledger(&details.seasons))
    }

    async fn fetch_genres(&self, genre_ref: &str) -> Result<Vec<String>, MetadataError> {
        let (media, ids) = parse_genre_ref(genre_ref)?;
        let table = self.genre_table(&media).await?;
        Ok(ids.iter().filter_map(|id| table.get(id).cloned()).collect())
    }
}

/// Parse a "media:id,id,..." genre reference.
fn parse_genre_ref(genre_ref: &str) -> Result<(String, Vec<u32>), MetadataError> {
    let (media, raw_ids) = genre_ref
        .split_once(':')
        .ok_or_else(|| MetadataError::Decode(format!("Bad genre reference: {}", genre_ref)))?;

    let mut ids = Vec::new();
    for raw in raw_ids.split(',').filter(|s| !s.is_empty()) {
        let id = raw
            .parse()
            .map_err(|_| MetadataError::Decode(format!("Bad genre reference: {}", genre_ref)))?;
        ids.push(id);
    }

    Ok((media.to_string(), ids))
}

fn next_cursor(page: u32, total_pages: u32, items: usize) -> Option<String> {
    if page >= total_pages || items == 0 {
        None
    } else {
        Some((page + 1).to_string())
    }
}

/// Expand per-season episode counts into individual ledger rows.
fn expand_episode_ledger(seasons: &[TmdbSeasonSummary]) -> Vec<EpisodeInfo> {
    let mut ledger = Vec::new();
    for season in seasons {
        let count = season.episode_count.unwrap_or(0);
        for episode in 1..=count {
            ledger.push(EpisodeInfo {
                season: season.season_number,
                episode,
                title: None,
                air_date: None,
            });
        }
    }
    ledger
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbListing {
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    results: Vec<TmdbListEntry>,
}

#[derive(Debug, Deserialize)]
struct TmdbListEntry {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeriesDetails {
    #[serde(default)]
    seasons: Vec<TmdbSeasonSummary>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonSummary {
    season_number: u32,
    #[serde(default)]
    episode_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreListing {
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: u32,
    name: String,
}
