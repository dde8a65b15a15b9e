// ABOUTME: CLI binary for harvest: extracts configured fields from web pages into JSON files.
// ABOUTME: Loads config.json, processes every website and writes one record per site.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use harvest_cli::{logging, run, Config, Fetcher, OutputWriter};
use tracing::{error, info, warn};

/// Extract product data from web pages using declarative selectors.
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(about = "Extract configured fields from web pages and save them as JSON", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short = 'c', long = "config", default_value = "config.json")]
    config: PathBuf,

    /// Directory for output JSON files
    #[arg(short = 'o', long = "output-dir", default_value = "output")]
    output_dir: PathBuf,

    /// Also write all records to this single file in the output directory
    #[arg(long = "combined")]
    combined: Option<String>,

    /// Log level or filter directive (overrides APP_LOG_LEVEL)
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Append logs to this file as well as stderr
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(args.log_level.as_deref(), args.log_file.as_deref()) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    info!("Starting product data parsing process...");

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            error!("Failed to load configuration. Exiting.");
            return ExitCode::from(1);
        }
    };

    if config.websites.is_empty() {
        warn!("No websites defined in the configuration. Nothing to parse.");
        return ExitCode::SUCCESS;
    }

    let fetcher = match Fetcher::new(&config.fetch) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    let writer = match OutputWriter::new(&args.output_dir) {
        Ok(writer) => writer,
        Err(e) => {
            error!("Failed to prepare output directory: {}", e);
            return ExitCode::from(1);
        }
    };

    let summary = run(&config, &fetcher, &writer, args.combined.as_deref());
    info!(
        saved = summary.saved,
        empty = summary.empty,
        failed = summary.failed,
        "Product data parsing process completed."
    );

    ExitCode::SUCCESS
}
