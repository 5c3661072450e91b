//! Configuration module for Miles
//!
//! This module handles the optional TOML configuration file, the file-type
//! catalog that drives link extraction, and the validated crawl request.
//!
//! # Example
//!
//! ```no_run
//! use miles::config::{load_config, FileTypeCatalog};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("miles.toml")).unwrap();
//! let catalog = FileTypeCatalog::with_extensions(&config.file_types).unwrap();
//! println!("Known file types: {:?}", catalog.identifiers().collect::<Vec<_>>());
//! ```

mod catalog;
mod parser;
mod request;
mod types;
mod validation;

// Re-export types
pub use catalog::{FileTypeCatalog, BUILTIN_FILE_TYPES};
pub use request::CrawlRequest;
pub use types::{Config, CrawlerConfig, HttpConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
