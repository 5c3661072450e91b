//! Crawler coordinator - main crawl orchestration logic
//!
//! This module sequences one crawl:
//! - Fetching the target page and extracting matching links
//! - Handing the links to the parallel dispatcher
//! - Timing the download phase
//! - Reducing the download results into a summary

use crate::config::{Config, CrawlRequest, FileTypeCatalog};
use crate::crawler::dispatcher::Dispatcher;
use crate::crawler::extractor::extract_links;
use crate::crawler::fetcher::build_http_client;
use crate::output::{CrawlSummary, ProgressReporter, StdoutReporter};
use crate::CrawlError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    catalog: FileTypeCatalog,
    reporter: Arc<dyn ProgressReporter>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Progress notices go to stdout until replaced with
    /// [`Coordinator::with_reporter`].
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration (HTTP client settings)
    /// * `catalog` - The file-type catalog used for link extraction
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config, catalog: FileTypeCatalog) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.http)?;

        Ok(Self {
            client,
            catalog,
            reporter: Arc::new(StdoutReporter),
        })
    }

    /// Replaces the progress reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Runs one crawl and returns its summary
    ///
    /// The page fetch happens before the timer starts; the reported time and
    /// bandwidth cover only the download phase.
    pub async fn run(&self, request: &CrawlRequest) -> Result<CrawlSummary, CrawlError> {
        tracing::info!(
            "Scanning {} for {} with {} workers",
            request.target_url(),
            request.file_types().join(", "),
            request.worker_count()
        );

        let links = extract_links(
            &self.client,
            request.target_url(),
            request.file_types(),
            &self.catalog,
        )
        .await;

        let dispatcher = Dispatcher::new(
            self.client.clone(),
            request.worker_count(),
            Arc::clone(&self.reporter),
        );

        let start_time = Instant::now();
        let paths = dispatcher.dispatch(links, request.destination()).await?;
        let elapsed = start_time.elapsed();

        let (files, bytes) = measure_downloads(&paths).await?;
        let summary = CrawlSummary::new(files, bytes, elapsed);

        tracing::info!(
            "Crawl completed: {} of {} links downloaded in {:?}",
            files,
            paths.len(),
            elapsed
        );

        Ok(summary)
    }
}

/// Counts the written files and sums their sizes on disk
async fn measure_downloads(paths: &[Option<PathBuf>]) -> Result<(u64, u64), CrawlError> {
    let mut files = 0;
    let mut bytes = 0;

    for path in paths.iter().flatten() {
        let metadata = tokio::fs::metadata(path).await?;
        files += 1;
        bytes += metadata.len();
    }

    Ok((files, bytes))
}

/// Runs a complete crawl operation
///
/// # Example
///
/// ```no_run
/// use miles::config::{Config, CrawlRequest, FileTypeCatalog};
/// use miles::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let catalog = FileTypeCatalog::builtin();
/// let request = CrawlRequest::new("https://example.com/", &["jpg"], ".", 4, &catalog)?;
/// let summary = crawl(&config, catalog, &request).await?;
/// print!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    catalog: FileTypeCatalog,
    request: &CrawlRequest,
) -> Result<CrawlSummary, CrawlError> {
    Coordinator::new(config, catalog)?.run(request).await
}
