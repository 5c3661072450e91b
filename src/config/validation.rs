use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;
use regex::Regex;
use std::collections::BTreeMap;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_file_types(&config.file_types)?;
    Ok(())
}

/// Validates crawler defaults
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(workers) = config.workers {
        validate_worker_count(workers)?;
    }

    if let Some(destination) = &config.destination {
        if destination.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "destination cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates a worker count from any source
///
/// Any positive count is accepted.
pub fn validate_worker_count(workers: usize) -> Result<(), ConfigError> {
    if workers == 0 {
        return Err(ConfigError::Validation(
            "workers must be at least 1, got 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty".to_string(),
            ));
        }
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates extra file-type entries
fn validate_file_types(file_types: &BTreeMap<String, Vec<String>>) -> Result<(), ConfigError> {
    for (identifier, patterns) in file_types {
        validate_identifier(identifier)?;

        if patterns.is_empty() {
            return Err(ConfigError::Validation(format!(
                "file type '{}' needs at least one pattern",
                identifier
            )));
        }

        for pattern in patterns {
            validate_pattern(pattern)?;
        }
    }
    Ok(())
}

/// Validates a file-type identifier: non-empty, ASCII alphanumeric
pub fn validate_identifier(identifier: &str) -> Result<(), ConfigError> {
    if identifier.is_empty() {
        return Err(ConfigError::Validation(
            "file type identifier cannot be empty".to_string(),
        ));
    }

    if !identifier.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "file type identifier must be alphanumeric, got '{}'",
            identifier
        )));
    }

    Ok(())
}

/// Compiles a link pattern, reporting why it was rejected
pub fn validate_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "pattern cannot be empty".to_string(),
        ));
    }

    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}
