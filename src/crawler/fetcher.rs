//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client from configuration
//! - GET requests returning the raw response body
//! - Classifying failures as values instead of errors

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Default User-Agent when the configuration does not set one
pub const DEFAULT_USER_AGENT: &str = concat!("miles/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Raw response body
        body: Vec<u8>,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, truncated body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects follow reqwest's default policy. No timeout is applied unless
/// `timeout-secs` is configured.
///
/// # Example
///
/// ```no_run
/// use miles::config::HttpConfig;
/// use miles::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .as_deref()
        .unwrap_or(DEFAULT_USER_AGENT);

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL with a single GET request
///
/// Never retries. Every failure comes back as a `FetchResult` variant:
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | `Success` |
/// | any other status | `HttpError` |
/// | connect/timeout/body error | `NetworkError` |
pub async fn fetch_bytes(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body: body.to_vec(),
        },
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
