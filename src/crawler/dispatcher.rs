//! Parallel download dispatcher
//!
//! This module handles:
//! - Running one download per URL on the tokio worker threads
//! - Limiting how many downloads are in flight at once
//! - Returning results in input order once every download has finished

use crate::crawler::downloader::download_url;
use crate::output::ProgressReporter;
use crate::CrawlError;
use reqwest::Client;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Fixed-size pool of download workers
///
/// At most `worker_count` downloads run at the same time. URLs are pulled from
/// the input only when a worker slot frees up, so a lazy URL source is
/// consumed at the pace of the downloads.
pub struct Dispatcher {
    client: Client,
    worker_count: NonZeroUsize,
    reporter: Arc<dyn ProgressReporter>,
}

impl Dispatcher {
    /// Creates a dispatcher
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client shared by every download
    /// * `worker_count` - Maximum number of downloads in flight
    /// * `reporter` - Receives a notice for each download attempt
    pub fn new(
        client: Client,
        worker_count: NonZeroUsize,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            client,
            worker_count,
            reporter,
        }
    }

    /// Downloads every URL into `destination` and waits for all of them
    ///
    /// Element `i` of the result belongs to URL `i` of the input, whatever
    /// order the downloads finish in. Nothing is returned until the last
    /// download completes.
    ///
    /// # Errors
    ///
    /// A filesystem error or a panicking worker fails the whole batch, but
    /// only after every other download has finished.
    pub async fn dispatch<I>(
        &self,
        urls: I,
        destination: &Path,
    ) -> Result<Vec<Option<PathBuf>>, CrawlError>
    where
        I: IntoIterator<Item = String>,
    {
        let semaphore = Arc::new(Semaphore::new(self.worker_count.get()));
        let destination = Arc::new(destination.to_path_buf());
        let mut handles = Vec::new();

        for url in urls {
            // Blocks until a worker slot is free
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| CrawlError::Worker("worker pool closed".to_string()))?;

            let client = self.client.clone();
            let destination = Arc::clone(&destination);
            let reporter = Arc::clone(&self.reporter);

            tracing::debug!("Dispatching download #{}: {}", handles.len(), url);
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                download_url(&client, &url, &destination, reporter.as_ref()).await
            }));
        }

        tracing::debug!(
            "Waiting for {} downloads on {} workers",
            handles.len(),
            self.worker_count
        );

        // Handles are awaited in input order, so slot i holds URL i's result
        let mut results = Vec::with_capacity(handles.len());
        let mut first_error = None;

        for handle in handles {
            match handle.await {
                Ok(Ok(path)) => results.push(path),
                Ok(Err(e)) => {
                    tracing::error!("Download worker failed: {}", e);
                    first_error.get_or_insert(e);
                    results.push(None);
                }
                Err(e) => {
                    tracing::error!("Download worker panicked: {}", e);
                    first_error.get_or_insert(CrawlError::Worker(e.to_string()));
                    results.push(None);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}
