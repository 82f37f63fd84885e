//! Kitsu API client.
//!
//! Serves the anime kinds. Kitsu is a JSON:API service; each listing
//! response carries the full URL of the next page, which doubles as our
//! cursor, and episode lists are walked the same way.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::{CandidatePage, CatalogCandidate, EpisodeInfo};
use super::{MetadataError, MetadataSource};
use crate::catalog::{ContentKind, ItemAttributes};
use crate::config::KitsuConfig;

/// Kitsu API client.
pub struct KitsuClient {
    client: Client,
    config: KitsuConfig,
}

impl KitsuClient {
    /// Create a new Kitsu client.
    pub fn new(config: KitsuConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn subtype(kind: ContentKind) -> Result<&'static str, MetadataError> {
        match kind {
            ContentKind::AnimeMovie => Ok("movie"),
            ContentKind::AnimeShow => Ok("TV"),
            other => Err(MetadataError::UnsupportedKind(other)),
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MetadataError> {
        let status = response.status();
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
}

#[async_trait]
impl MetadataSource for KitsuClient {
    fn name(&self) -> &str {
        "kitsu"
    }

    async fn list_page(
        &self,
        kind: ContentKind,
        cursor: Option<String>,
    ) -> Result<CandidatePage, MetadataError> {
        let subtype = Self::subtype(kind)?;
        let url = match cursor {
            Some(next) => next,
            None => format!(
                "{}/anime?filter[subtype]={}&page[limit]={}",
                self.base(),
                subtype,
                self.config.page_limit
            ),
        };

        debug!(%url, "Fetching Kitsu listing page");

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;

        let listing: KitsuListing = response
            .json()
            .await
            .map_err(|e| MetadataError::Decode(format!("Failed to parse Kitsu listing: {}", e)))?;

        let items = listing
            .data
            .into_iter()
            .filter_map(|resource| resource_to_candidate(kind, resource))
            .collect();

        Ok(CandidatePage {
            items,
            next: listing.links.next,
        })
    }

    async fn fetch_episodes(&self, key: &str) -> Result<Vec<EpisodeInfo>, MetadataError> {
        let mut url = format!(
            "{}/anime/{}/episodes?page[limit]={}",
            self.base(),
            key,
            self.config.page_limit
        );
        let mut episodes = Vec::new();

        loop {
            debug!(%url, "Fetching Kitsu episode page");

            let response = self.client.get(&url).send().await?;
            let response = Self::check_status(response).await?;

            let page: KitsuEpisodeListing = response.json().await.map_err(|e| {
                MetadataError::Decode(format!("Failed to parse Kitsu episode page: {}", e))
            })?;

            if page.data.is_empty() {
                break;
            }
            episodes.extend(page.data.into_iter().filter_map(episode_from_resource));

            match page.links.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(episodes)
    }

    async fn fetch_genres(&self, genre_ref: &str) -> Result<Vec<String>, MetadataError> {
        debug!(url = genre_ref, "Fetching Kitsu genres");

        let response = self.client.get(genre_ref).send().await?;
        let response = Self::check_status(response).await?;

        let listing: KitsuGenreListing = response.json().await.map_err(|e| {
            MetadataError::Decode(format!("Failed to parse Kitsu genre response: {}", e))
        })?;

        Ok(listing
            .data
            .into_iter()
            .filter_map(|genre| genre.attributes.name)
            .collect())
    }
}

fn resource_to_candidate(kind: ContentKind, resource: KitsuResource) -> Option<CatalogCandidate> {
    let attrs = resource.attributes;

    let title = attrs
        .canonical_title
        .or(attrs.titles.en)
        .or(attrs.titles.en_jp)
        .unwrap_or_default();
    if title.is_empty() {
        debug!(id = %resource.id, "Skipping Kitsu entry without a usable title");
        return None;
    }

    let source_updated_at = attrs.updated_at.as_deref().and_then(parse_timestamp);

    let attributes = ItemAttributes {
        synopsis: attrs.synopsis.unwrap_or_default(),
        start_date: attrs.start_date,
        average_rating: attrs.average_rating,
        popularity_rank: attrs.popularity_rank,
        rating_rank: attrs.rating_rank,
        poster_url: attrs.poster_image.and_then(|img| img.original),
        backdrop_url: attrs.cover_image.and_then(|img| img.original),
        status: attrs.status,
        episode_count: attrs.episode_count,
    };

    let genre_ref = resource
        .relationships
        .and_then(|r| r.genres)
        .and_then(|g| g.links)
        .and_then(|l| l.related);

    Some(CatalogCandidate {
        provider_id: resource.id,
        kind,
        title,
        attributes,
        genre_ref,
        source_updated_at,
    })
}

fn episode_from_resource(resource: KitsuEpisodeResource) -> Option<EpisodeInfo> {
    let attrs = resource.attributes;
    // Entries with no episode number cannot be placed on the grid.
    let episode = attrs.number?;
    Some(EpisodeInfo {
        season: attrs.season_number.unwrap_or(1),
        episode,
        title: attrs.canonical_title,
        air_date: attrs.airdate,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// Kitsu API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct KitsuListing {
    #[serde(default)]
    data: Vec<KitsuResource>,
    #[serde(default)]
    links: KitsuLinks,
}

#[derive(Debug, Default, Deserialize)]
struct KitsuLinks {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KitsuResource {
    id: String,
    attributes: KitsuAttributes,
    #[serde(default)]
    relationships: Option<KitsuRelationships>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KitsuAttributes {
    #[serde(default)]
    canonical_title: Option<String>,
    #[serde(default)]
    titles: KitsuTitles,
    #[serde(default)]
    synopsis: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    average_rating: Option<String>,
    #[serde(default)]
    popularity_rank: Option<i64>,
    #[serde(default)]
    rating_rank: Option<i64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    episode_count: Option<u32>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    poster_image: Option<KitsuImage>,
    #[serde(default)]
    cover_image: Option<KitsuImage>,
}

// Kitsu title keys are already snake_case ("en_jp"), unlike the attributes.
#[derive(Debug, Default, Deserialize)]
struct KitsuTitles {
    #[serde(default)]
    en: Option<String>,
    #[serde(default)]
    en_jp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KitsuImage {
    #[serde(default)]
    original: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KitsuRelationships {
    #[serde(default)]
    genres: Option<KitsuRelated>,
}

#[derive(Debug, Deserialize)]
struct KitsuRelated {
    #[serde(default)]
    links: Option<KitsuRelatedLinks>,
}

#[derive(Debug, Deserialize)]
struct KitsuRelatedLinks {
    #[serde(default)]
    related: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KitsuEpisodeListing {
    #[serde(default)]
    data: Vec<KitsuEpisodeResource>,
    #[serde(default)]
    links: KitsuLinks,
}

#[derive(Debug, Deserialize)]
struct KitsuEpisodeResource {
    attributes: KitsuEpisodeAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KitsuEpisodeAttributes {
    #[serde(default)]
    season_number: Option<u32>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    canonical_title: Option<String>,
    #[serde(default)]
    airdate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KitsuGenreListing {
    #[serde(default)]
    data: Vec<KitsuGenreResource>,
}

#[derive(Debug, Deserialize)]
struct KitsuGenreResource {
    attributes: KitsuGenreAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct KitsuGenreAttributes {
    #[serde(default)]
    name: Option<String>,
}
