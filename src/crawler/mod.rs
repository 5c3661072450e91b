//! Crawler module for page scanning and parallel downloads
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching with failures reported as values
//! - Regex-driven link extraction from the scanned page
//! - Single-file downloads into the destination directory
//! - A bounded worker pool that preserves input order
//! - Overall crawl coordination and timing

mod coordinator;
mod dispatcher;
mod downloader;
mod extractor;
mod fetcher;

pub use coordinator::{crawl, Coordinator};
pub use dispatcher::Dispatcher;
pub use downloader::download_url;
pub use extractor::{extract_links, scan_links, ExtractedLinks};
pub use fetcher::{build_http_client, fetch_bytes, FetchResult, DEFAULT_USER_AGENT};
