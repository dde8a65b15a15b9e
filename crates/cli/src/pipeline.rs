// ABOUTME: Orchestrates a run: per website, fetch the page, extract fields and save the record.
// ABOUTME: Failures are scoped to one website; the run always continues with the next one.

use harvest_extract::{extract_with_faults, Document};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{Config, Site};
use crate::fetch::{FetchError, Fetcher};
use crate::output::{file_stem_for, OutputError, OutputWriter, ProductRecord};

/// Why a website produced no record.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("URL not provided in config")]
    MissingUrl,

    #[error("no parser configured for parser type {0:?}")]
    UnknownParser(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Counts of what happened to each website during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub saved: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Fetches and extracts one website. `Ok(None)` means no fields were configured.
pub fn process_site(
    config: &Config,
    site: &Site,
    fetcher: &Fetcher,
) -> Result<Option<ProductRecord>, SiteError> {
    let url = site.url.as_deref().ok_or(SiteError::MissingUrl)?;
    let rules = config
        .rules_for(site)
        .ok_or_else(|| SiteError::UnknownParser(site.parser_type.clone()))?;

    info!(
        "Processing '{}' from URL: {} (Parser Type: {})",
        site.name, url, site.parser_type
    );
    let html = fetcher.fetch(url)?;

    let doc = Document::parse(&html);
    let extraction = extract_with_faults(&doc, rules);
    for (field, fault) in &extraction.faults {
        if !fault.is_omission() {
            warn!(site = %site.name, field = %field, "{}", fault);
        }
    }

    if extraction.result.is_empty() {
        return Ok(None);
    }
    Ok(Some(ProductRecord::new(extraction.result, site.raw.clone())))
}

/// Processes every website in order, saving one file per record and, with
/// `combined`, all records in a single file as well.
pub fn run(
    config: &Config,
    fetcher: &Fetcher,
    writer: &OutputWriter,
    combined: Option<&str>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut records = Vec::new();

    for site in &config.websites {
        match process_site(config, site, fetcher) {
            Ok(Some(record)) => {
                info!("Successfully extracted data for '{}'.", site.name);
                match writer.save_record(&record, &file_stem_for(&site.name)) {
                    Ok(path) => {
                        info!("Data for '{}' saved to {}.", site.name, path.display());
                        summary.saved += 1;
                        records.push(record);
                    }
                    Err(e) => {
                        error!("Failed to save data for '{}': {}", site.name, e);
                        summary.failed += 1;
                    }
                }
            }
            Ok(None) => {
                warn!(
                    "No data extracted for '{}' from URL: {}.",
                    site.name,
                    site.url.as_deref().unwrap_or_default()
                );
                summary.empty += 1;
            }
            Err(SiteError::MissingUrl) => {
                error!("Skipping '{}': URL not provided in config.", site.name);
                summary.failed += 1;
            }
            Err(e) => {
                error!("Error while processing '{}': {}", site.name, e);
                summary.failed += 1;
            }
        }
    }

    if let Some(name) = combined {
        match writer.save_all(&records, name) {
            Ok(path) => info!("Saved {} records to {}.", records.len(), path.display()),
            Err(e) => error!("Failed to save combined output: {}", e),
        }
    }

    summary
}
