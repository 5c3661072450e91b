use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure for Miles
///
/// Every section is optional; an absent file behaves like `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Extra link patterns keyed by file-type identifier
    #[serde(default, rename = "file-types")]
    pub file_types: BTreeMap<String, Vec<String>>,
}

/// Crawl defaults used when the command line leaves them out
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent download workers
    pub workers: Option<usize>,

    /// Directory downloaded files are written into
    pub destination: Option<PathBuf>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Whole-request timeout in seconds; no timeout when absent
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}
