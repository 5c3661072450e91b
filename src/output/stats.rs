//! Throughput summary for a finished crawl

use std::fmt;
use std::time::Duration;

/// Bytes in one reported megabyte
pub const BYTES_PER_MEGABYTE: f64 = (1u64 << 20) as f64;

/// Aggregate result of one crawl
///
/// Derived purely from the successful downloads and the timing of the
/// download phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrawlSummary {
    /// Number of files written
    pub files_downloaded: u64,

    /// Total size of written files, in megabytes (2^20 bytes)
    pub megabytes_downloaded: f64,

    /// Wall time of the download phase
    pub elapsed_seconds: f64,

    /// `megabytes_downloaded / elapsed_seconds`, or 0 when no time elapsed
    pub bandwidth_mbps: f64,
}

impl CrawlSummary {
    /// Builds a summary from raw totals
    ///
    /// # Arguments
    ///
    /// * `files_downloaded` - Count of successful downloads
    /// * `bytes_downloaded` - Sum of their sizes on disk
    /// * `elapsed` - Wall time of the download phase
    pub fn new(files_downloaded: u64, bytes_downloaded: u64, elapsed: Duration) -> Self {
        let megabytes_downloaded = bytes_downloaded as f64 / BYTES_PER_MEGABYTE;
        let elapsed_seconds = elapsed.as_secs_f64();

        Self {
            files_downloaded,
            megabytes_downloaded,
            elapsed_seconds,
            bandwidth_mbps: compute_bandwidth(megabytes_downloaded, elapsed_seconds),
        }
    }
}

/// Megabytes per second, guarded against a zero or negative time span
pub fn compute_bandwidth(megabytes: f64, elapsed_seconds: f64) -> f64 {
    if elapsed_seconds > 0.0 {
        megabytes / elapsed_seconds
    } else {
        0.0
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files Downloaded: {}", self.files_downloaded)?;
        writeln!(f, "Bytes Downloaded: {:.2} MB", self.megabytes_downloaded)?;
        writeln!(f, "Elapsed Time:     {:.2} s", self.elapsed_seconds)?;
        writeln!(f, "Bandwidth:        {:.2} MB/s", self.bandwidth_mbps)
    }
}

/// Prints the summary to stdout in the fixed four-line format
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", summary);
}
