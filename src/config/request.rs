use crate::config::catalog::FileTypeCatalog;
use crate::config::validation::validate_worker_count;
use crate::ConfigError;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use url::Url;

/// A fully validated description of one crawl
///
/// Immutable once built: the page to scan, the file types to look for (in
/// catalog order, never empty), where to write downloads, and how many
/// downloads may run at once.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    target_url: Url,
    file_types: Vec<String>,
    destination: PathBuf,
    worker_count: NonZeroUsize,
}

impl CrawlRequest {
    /// Builds a crawl request, checking every field against the catalog
    ///
    /// An empty `file_types` selection means every identifier in `catalog`.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidUrl` - `target_url` does not parse
    /// * `ConfigError::UnknownFileType` - a requested type is not in `catalog`
    /// * `ConfigError::Validation` - worker count of zero, or the
    ///   selection resolves to no file types at all
    pub fn new<S: AsRef<str>>(
        target_url: &str,
        file_types: &[S],
        destination: impl Into<PathBuf>,
        worker_count: usize,
        catalog: &FileTypeCatalog,
    ) -> Result<Self, ConfigError> {
        let target_url = Url::parse(target_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", target_url, e)))?;

        validate_worker_count(worker_count)?;
        let worker_count = NonZeroUsize::new(worker_count).ok_or_else(|| {
            ConfigError::Validation("workers must be at least 1".to_string())
        })?;

        let file_types = catalog.select(file_types)?;
        if file_types.is_empty() {
            return Err(ConfigError::Validation(
                "no file types to look for: the catalog is empty".to_string(),
            ));
        }

        Ok(Self {
            target_url,
            file_types,
            destination: destination.into(),
            worker_count,
        })
    }

    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    /// Requested identifiers, in catalog order
    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn worker_count(&self) -> NonZeroUsize {
        self.worker_count
    }
}
