use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scrape::ScrapeConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub kitsu: KitsuConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

/// Catalog store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("nitrate.db")
}

/// Torrent search aggregator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Aggregator base URL up to and including the site segment
    /// (e.g., "http://localhost:8009/api/v1/all")
    #[serde(default = "default_search_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_search_url() -> String {
    "http://localhost:8009/api/v1/all".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// TMDB metadata provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB API key; movie and show scrapers refuse to start without one
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tmdb_url")]
    pub base_url: String,
    /// Prefix prepended to relative poster paths
    #[serde(default = "default_tmdb_image_url")]
    pub image_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_url(),
            image_base_url: default_tmdb_image_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

/// Kitsu metadata provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KitsuConfig {
    #[serde(default = "default_kitsu_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Page size for listing and episode requests (Kitsu caps this at 20)
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for KitsuConfig {
    fn default() -> Self {
        Self {
            base_url: default_kitsu_url(),
            timeout_secs: default_timeout(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_kitsu_url() -> String {
    "https://kitsu.io/api/edge".to_string()
}

fn default_page_limit() -> u32 {
    20
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub kitsu: KitsuConfig,
    pub scrape: ScrapeConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            store: config.store.clone(),
            search: config.search.clone(),
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                image_base_url: config.tmdb.image_base_url.clone(),
                api_key_configured: !config.tmdb.api_key.is_empty(),
                timeout_secs: config.tmdb.timeout_secs,
            },
            kitsu: config.kitsu.clone(),
            scrape: config.scrape.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentKind;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.path.to_str().unwrap(), "nitrate.db");
        assert_eq!(config.search.base_url, "http://localhost:8009/api/v1/all");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert!(config.tmdb.api_key.is_empty());
        assert_eq!(config.kitsu.page_limit, 20);
        assert_eq!(config.scrape.max_concurrent_items, 5);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml = r#"
[store]
path = "/data/catalog.sqlite"

[tmdb]
api_key = "test-key"
timeout_secs = 60

[scrape]
kinds = ["movie", "show"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.store.path.to_str().unwrap(), "/data/catalog.sqlite");
        assert_eq!(config.tmdb.api_key, "test-key");
        assert_eq!(config.tmdb.timeout_secs, 60);
        // Untouched sections keep their defaults.
        assert_eq!(config.kitsu.base_url, "https://kitsu.io/api/edge");
        assert_eq!(
            config.scrape.kinds,
            vec![ContentKind::Movie, ContentKind::Show]
        );
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let config = Config {
            tmdb: TmdbConfig {
                api_key: "secret-key".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.tmdb.api_key_configured);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }

    #[test]
    fn test_sanitized_config_without_api_key() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(!sanitized.tmdb.api_key_configured);
    }
}
