// ABOUTME: Loading and validation of the harvest configuration file.
// ABOUTME: Defines websites to process, named parser rule sets and fetch options.

//! Configuration file handling.
//!
//! ```json
//! {
//!     "websites": [{"name": "Kettle", "url": "https://shop.example/kettle", "parser_type": "default"}],
//!     "parsers": {"default": {"data_points": {"name": {"selector": "h1"}}}},
//!     "fetch": {"timeout_secs": 30}
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use harvest_extract::FieldRuleSet;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Name given to websites that do not declare one.
pub const DEFAULT_SITE_NAME: &str = "Unknown Product";
/// Parser used by websites that do not declare a `parser_type`.
pub const DEFAULT_PARSER_TYPE: &str = "default";
/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default User-Agent header for page fetches.
pub const DEFAULT_USER_AGENT: &str = concat!("harvest/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON, or a section has the wrong shape.
    #[error("error decoding JSON from configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is well formed but the structure is not usable.
    #[error("invalid configuration structure in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Options for the page fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchOptions {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

/// A named set of field rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub data_points: FieldRuleSet,
}

/// One website entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub name: String,
    /// Page location: an http(s) URL or a local file path. `None` when missing or empty.
    pub url: Option<String>,
    pub parser_type: String,
    /// Inline rules, used instead of the named parser when present.
    pub data_points: Option<FieldRuleSet>,
    /// The entry exactly as written, attached to output records as provenance.
    pub raw: Value,
}

#[derive(Deserialize)]
struct SiteFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    parser_type: Option<String>,
    #[serde(default)]
    data_points: Option<FieldRuleSet>,
}

impl Site {
    /// Builds a site from its raw JSON entry.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let fields = SiteFields::deserialize(&raw)?;
        Ok(Self {
            name: fields
                .name
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            url: fields.url.filter(|u| !u.trim().is_empty()),
            parser_type: fields
                .parser_type
                .unwrap_or_else(|| DEFAULT_PARSER_TYPE.to_string()),
            data_points: fields.data_points,
            raw,
        })
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    websites: Vec<Value>,
    #[serde(default)]
    parsers: BTreeMap<String, ParserConfig>,
    #[serde(default)]
    fetch: FetchOptions,
}

/// The loaded configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub websites: Vec<Site>,
    pub parsers: BTreeMap<String, ParserConfig>,
    pub fetch: FetchOptions,
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    /// Parses and validates configuration JSON; `path` is only used in errors.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parse_err = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let value: Value = serde_json::from_str(content).map_err(parse_err)?;
        if !value.get("websites").is_some_and(Value::is_array) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: "config file must contain a 'websites' key with a list of entries"
                    .to_string(),
            });
        }

        let file: ConfigFile = serde_json::from_value(value).map_err(parse_err)?;
        let websites = file
            .websites
            .into_iter()
            .map(Site::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(parse_err)?;

        Ok(Self {
            websites,
            parsers: file.parsers,
            fetch: file.fetch,
        })
    }

    /// The rules to apply to `site`: its inline rules, else its named parser.
    pub fn rules_for<'a>(&'a self, site: &'a Site) -> Option<&'a FieldRuleSet> {
        site.data_points
            .as_ref()
            .or_else(|| self.parsers.get(&site.parser_type).map(|p| &p.data_points))
    }
}
