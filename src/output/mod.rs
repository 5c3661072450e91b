//! Output module for crawl progress and summaries
//!
//! This module handles:
//! - Reporting each download attempt as it starts
//! - Aggregating download results into a throughput summary
//! - Printing the summary in the fixed four-line format

mod progress;
pub mod stats;

pub use progress::{ProgressReporter, SilentReporter, StdoutReporter};
pub use stats::{compute_bandwidth, print_summary, CrawlSummary, BYTES_PER_MEGABYTE};
