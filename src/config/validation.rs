use crate::config::types::CrawlConfig;
use crate::url::normalize_url;
use crate::ConfigError;

/// Validates a crawl configuration
///
/// Bounds are checked after parsing so a config from TOML and a config
/// assembled from CLI flags go through the same gate.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    normalize_url(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("seed-url '{}': {}", config.seed_url, e)))?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be a finite value >= 0, got {}",
            config.delay_seconds
        )));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
