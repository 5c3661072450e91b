//! Single-file downloader

use crate::crawler::fetcher::{fetch_bytes, FetchResult};
use crate::output::ProgressReporter;
use crate::url::file_name_from_url;
use crate::CrawlError;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Downloads one URL into `destination`
///
/// The progress notice goes out before the request is sent. The file is named
/// after the text following the URL's last `/` and silently replaces any file
/// already at that path.
///
/// # Returns
///
/// * `Ok(Some(path))` - The body was written to `path`
/// * `Ok(None)` - The fetch failed (transport error or non-2xx status), or the
///   URL has no usable file name; no file is created
/// * `Err(CrawlError::Io)` - Writing the file failed
pub async fn download_url(
    client: &Client,
    url: &str,
    destination: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<Option<PathBuf>, CrawlError> {
    reporter.download_started(url);

    let body = match fetch_bytes(client, url).await {
        FetchResult::Success { body, .. } => body,
        FetchResult::HttpError { status_code } => {
            tracing::warn!("Download of {} failed: HTTP {}", url, status_code);
            return Ok(None);
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Download of {} failed: {}", url, error);
            return Ok(None);
        }
    };

    let name = file_name_from_url(url);
    if matches!(name, "" | "." | "..") {
        tracing::warn!("No file name in {}, skipping", url);
        return Ok(None);
    }

    let path = destination.join(name);
    tokio::fs::write(&path, &body).await?;
    tracing::debug!("Wrote {} bytes to {}", body.len(), path.display());

    Ok(Some(path))
}
