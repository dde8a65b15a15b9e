// ABOUTME: Orchestration library behind the harvest binary.
// ABOUTME: Configuration loading, page fetching, JSON output and logging setup around the extraction engine.

pub mod config;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod pipeline;

pub use config::{Config, ConfigError, FetchOptions, ParserConfig, Site};
pub use fetch::{FetchError, Fetcher};
pub use output::{OutputError, OutputWriter, ProductRecord};
pub use pipeline::{process_site, run, RunSummary, SiteError};
