//! URL handling module for Miles
//!
//! This module provides relative link resolution against the scanned page and
//! derivation of local file names from download URLs.

mod filename;
mod resolve;

// Re-export main functions
pub use filename::file_name_from_url;
pub use resolve::resolve_url;
