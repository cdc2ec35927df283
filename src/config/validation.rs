//! Source configuration validation
//!
//! A configuration problem is the only fatal error in the pipeline, so every
//! source entry is checked up front, before any fetch is attempted.

use crate::config::types::SourceConfig;
use crate::ConfigError;
use url::Url;

/// Validates a single source configuration
///
/// Checks that:
/// - `source_id` and `name` are non-empty
/// - `seed_url` is present, parseable, and uses http/https
/// - crawl bounds are non-zero
pub fn validate(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.source_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source-id must not be empty".to_string(),
        ));
    }

    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "source {}: name must not be empty",
            config.source_id
        )));
    }

    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "source {}: seed-url must not be empty",
            config.source_id
        )));
    }

    let seed = Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.seed_url, e)))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url must be http or https, got: {}",
            config.seed_url
        )));
    }

    if seed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url has no host: {}",
            config.seed_url
        )));
    }

    if config.max_pages == 0 {
        return Err(ConfigError::Validation(format!(
            "source {}: max-pages must be at least 1",
            config.source_id
        )));
    }

    Ok(())
}
