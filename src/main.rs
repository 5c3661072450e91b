//! Miles main entry point
//!
//! This is the command-line interface for the Miles file harvester.

use clap::Parser;
use miles::config::{load_config_with_hash, Config, CrawlRequest, FileTypeCatalog};
use miles::crawler::Coordinator;
use miles::output::{print_summary, SilentReporter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Miles: crawl one page and download the files it links to
///
/// Crawl the given URL for the specified FILETYPES and download the files to
/// the DESTINATION folder using WORKERS downloads in parallel.
#[derive(Parser, Debug)]
#[command(name = "miles")]
#[command(version)]
#[command(about = "Download every linked file of the given types from one page", long_about = None)]
struct Cli {
    /// Page to scan for links
    #[arg(value_name = "URL")]
    url: String,

    /// Save the files to this folder (default: .)
    #[arg(short, long, value_name = "DESTINATION")]
    destination: Option<PathBuf>,

    /// Number of downloads to run in parallel (default: 1)
    #[arg(short = 'n', long = "workers", value_name = "WORKERS")]
    workers: Option<usize>,

    /// File types to download, e.g. `-f jpg,png` or `-f jpg -f png` (default: all)
    #[arg(short = 'f', long = "file-types", value_name = "FILETYPES", value_delimiter = ',')]
    file_types: Vec<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress lines and non-error logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    handle_crawl(cli, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("miles=info,warn"),
            1 => EnvFilter::new("miles=debug,info"),
            2 => EnvFilter::new("miles=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the main crawl operation
async fn handle_crawl(cli: Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = FileTypeCatalog::with_extensions(&config.file_types)?;

    // Command-line flags win over the configuration file
    let destination = cli
        .destination
        .or_else(|| config.crawler.destination.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let workers = cli.workers.or(config.crawler.workers).unwrap_or(1);

    let request = CrawlRequest::new(&cli.url, cli.file_types.as_slice(), destination, workers, &catalog)?;

    if !request.destination().exists() {
        tracing::info!("Creating destination {}", request.destination().display());
        tokio::fs::create_dir_all(request.destination()).await?;
    }

    let mut coordinator = Coordinator::new(&config, catalog)?;
    if cli.quiet {
        coordinator = coordinator.with_reporter(Arc::new(SilentReporter));
    }

    match coordinator.run(&request).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
