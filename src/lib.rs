//! Miles: a single-page parallel file harvester
//!
//! This crate fetches one web page, scans its markup for links to recognized
//! file types, and downloads every match concurrently into a destination
//! directory, reporting the aggregate throughput of the download phase.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Miles operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Download worker failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid link pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
}

/// Result type alias for Miles operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlRequest, FileTypeCatalog};
pub use crawler::{crawl, Coordinator};
pub use output::CrawlSummary;
pub use crate::url::{file_name_from_url, resolve_url};
