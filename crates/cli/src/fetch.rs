// ABOUTME: Page fetcher returning HTML text for http(s) URLs and local file paths.
// ABOUTME: Wraps a blocking reqwest client configured from the fetch options.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::FetchOptions;

/// Errors that can occur while obtaining a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target is neither a usable URL nor a file path.
    #[error("invalid target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// The HTTP client failed (connection, timeout, body decoding).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// A local file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Obtains page HTML from the web or the local filesystem.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher with the configured timeout and user agent.
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|source| FetchError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    /// Returns the HTML text at `target`.
    ///
    /// `http://` and `https://` targets are fetched; `file://` URLs and plain
    /// paths are read from disk with lossy UTF-8 decoding.
    pub fn fetch(&self, target: &str) -> Result<String, FetchError> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return self.fetch_url(target);
        }

        let path = if target.starts_with("file://") {
            Url::parse(target)
                .ok()
                .and_then(|u| u.to_file_path().ok())
                .ok_or_else(|| FetchError::InvalidTarget {
                    target: target.to_string(),
                    reason: "not a local file URL".to_string(),
                })?
        } else {
            PathBuf::from(target)
        };
        read_file(path)
    }

    fn fetch_url(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching page");
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        resp.text().map_err(http_err)
    }
}

fn read_file(path: PathBuf) -> Result<String, FetchError> {
    debug!(path = %path.display(), "reading page from file");
    match fs::read(&path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(source) => Err(FetchError::Io { path, source }),
    }
}
