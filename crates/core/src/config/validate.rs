use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Base URLs are non-empty
/// - Timeouts are non-zero
/// - Per-scraper concurrency is in the 3-20 band
/// - Kitsu page limit respects the API cap of 20
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.search.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "search.base_url cannot be empty".to_string(),
        ));
    }
    if config.tmdb.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.base_url cannot be empty".to_string(),
        ));
    }
    if config.kitsu.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "kitsu.base_url cannot be empty".to_string(),
        ));
    }

    if config.search.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.tmdb.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "tmdb.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.kitsu.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "kitsu.timeout_secs cannot be 0".to_string(),
        ));
    }

    let concurrency = config.scrape.max_concurrent_items;
    if !(3..=20).contains(&concurrency) {
        return Err(ConfigError::ValidationError(format!(
            "scrape.max_concurrent_items must be between 3 and 20, got {}",
            concurrency
        )));
    }

    if config.kitsu.page_limit == 0 || config.kitsu.page_limit > 20 {
        return Err(ConfigError::ValidationError(format!(
            "kitsu.page_limit must be between 1 and 20, got {}",
            config.kitsu.page_limit
        )));
    }

    if config.scrape.kinds.is_empty() {
        return Err(ConfigError::ValidationError(
            "scrape.kinds cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_concurrency_band() {
        let mut config = Config::default();
        config.scrape.max_concurrent_items = 2;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        config.scrape.max_concurrent_items = 21;
        assert!(validate_config(&config).is_err());

        config.scrape.max_concurrent_items = 20;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.tmdb.timeout_secs = 0;
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("tmdb.timeout_secs"));
    }

    #[test]
    fn test_validate_empty_base_url_fails() {
        let mut config = Config::default();
        config.search.base_url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_page_limit_cap() {
        let mut config = Config::default();
        config.kitsu.page_limit = 50;
        assert!(validate_config(&config).is_err());
        config.kitsu.page_limit = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_kinds_fails() {
        let mut config = Config::default();
        config.scrape.kinds.clear();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("scrape.kinds"));
    }
}
