//! Download progress reporting

/// Receives a notice for every download attempt
///
/// Called from many workers at once; implementations must not assume any
/// ordering between notices from different URLs.
pub trait ProgressReporter: Send + Sync {
    /// Called before the request for `url` is sent
    fn download_started(&self, url: &str);
}

/// Writes `Downloading <url>...` lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl ProgressReporter for StdoutReporter {
    fn download_started(&self, url: &str) {
        println!("Downloading {}...", url);
    }
}

/// Discards progress notices (used with `--quiet`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn download_started(&self, url: &str) {
        tracing::trace!("Downloading {}", url);
    }
}
