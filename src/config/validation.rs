use crate::config::types::{AnalyzerConfig, CacheConfig, Config};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_analyzer_config(&config.analyzer)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates fetch and probe settings
fn validate_analyzer_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "analyzer.fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.probe_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "analyzer.probe-timeout-secs must be >= 1".to_string(),
        ));
    }

    // One slow link must never hold the result longer than the page itself
    if config.probe_timeout_secs >= config.fetch_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "analyzer.probe-timeout-secs ({}) must be less than analyzer.fetch-timeout-secs ({})",
            config.probe_timeout_secs, config.fetch_timeout_secs
        )));
    }

    if config.max_document_bytes == 0 {
        return Err(ConfigError::Validation(
            "analyzer.max-document-bytes must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "analyzer.user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates cache settings
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.enabled && config.ttl_secs == 0 {
        return Err(ConfigError::Validation(
            "cache.ttl-secs must be >= 1 when the cache is enabled".to_string(),
        ));
    }

    Ok(())
}
