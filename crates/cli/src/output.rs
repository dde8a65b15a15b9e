// ABOUTME: JSON persistence of extraction records into an output directory.
// ABOUTME: Writes 4-space indented JSON with non-ASCII text kept literal.

//! Output handling.
//!
//! Records are written either one file per site ([`OutputWriter::save_record`])
//! or as a single JSON array ([`OutputWriter::save_all`]). File names always end
//! in `.json`; any other extension is replaced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use harvest_extract::ExtractionResult;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Key under which the website entry is attached to each record.
pub const SOURCE_CONFIG_KEY: &str = "source_config";

/// Errors that can occur while writing output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The data could not be serialized to JSON.
    #[error("data not JSON serializable: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The file or directory could not be written.
    #[error("failed to write data to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Extracted fields of one page plus the website entry they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    #[serde(flatten)]
    pub fields: ExtractionResult,
    pub source_config: Value,
}

impl ProductRecord {
    /// Attaches provenance to an extraction result.
    ///
    /// A field named `source_config` is replaced by the provenance.
    pub fn new(mut fields: ExtractionResult, source_config: Value) -> Self {
        fields.remove(SOURCE_CONFIG_KEY);
        Self {
            fields,
            source_config,
        }
    }
}

/// Writes records as JSON files below a directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Creates the writer, creating `dir` and its parents if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| OutputError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes one record to `<dir>/<filename>.json` and returns the absolute path.
    pub fn save_record(&self, record: &ProductRecord, filename: &str) -> Result<PathBuf, OutputError> {
        self.write_json(record, filename)
    }

    /// Writes all records as a JSON array to `<dir>/<filename>.json`.
    pub fn save_all(&self, records: &[ProductRecord], filename: &str) -> Result<PathBuf, OutputError> {
        self.write_json(records, filename)
    }

    fn write_json<T: Serialize + ?Sized>(&self, data: &T, filename: &str) -> Result<PathBuf, OutputError> {
        let path = with_json_extension(self.dir.join(filename));
        let bytes = to_pretty_json(data)?;

        let io_err = |source| OutputError::Io {
            path: path.clone(),
            source,
        };
        fs::write(&path, bytes).map_err(io_err)?;
        fs::canonicalize(&path).map_err(io_err)
    }
}

/// Serializes with 4-space indentation; serde_json leaves non-ASCII unescaped.
pub fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)?;
    Ok(buf)
}

fn with_json_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        path.set_extension("json");
    }
    path
}

/// Turns a site name into a file stem: lowercase ASCII alphanumerics joined by `_`.
pub fn file_stem_for(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "record".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_extract::FieldValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(name: &str) -> ProductRecord {
        let mut fields = ExtractionResult::new();
        fields.insert("name", FieldValue::Single(Some(name.to_string())));
        fields.insert("images", FieldValue::Multi(vec![]));
        ProductRecord::new(fields, json!({"name": name, "url": "page.html"}))
    }

    #[test]
    fn new_creates_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        let writer = OutputWriter::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(writer.dir(), dir.as_path());
    }

    #[test]
    fn save_record_writes_pretty_unescaped_json() {
        let tmp = TempDir::new().unwrap();
        let writer = OutputWriter::new(tmp.path()).unwrap();

        let path = writer.save_record(&record("Чайник"), "kettle").unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.file_name().unwrap(), "kettle.json");

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n    \"images\": [],\n    \"name\": \"Чайник\",\n    \"source_config\": {\n        \"name\": \"Чайник\",\n        \"url\": \"page.html\"\n    }\n}"
        );
    }

    #[test]
    fn extension_is_forced_to_json() {
        let tmp = TempDir::new().unwrap();
        let writer = OutputWriter::new(tmp.path()).unwrap();

        let kept = writer.save_record(&record("a"), "a.json").unwrap();
        assert_eq!(kept.file_name().unwrap(), "a.json");

        let replaced = writer.save_record(&record("b"), "b.txt").unwrap();
        assert_eq!(replaced.file_name().unwrap(), "b.json");
    }

    #[test]
    fn save_all_writes_an_array() {
        let tmp = TempDir::new().unwrap();
        let writer = OutputWriter::new(tmp.path()).unwrap();

        let path = writer
            .save_all(&[record("a"), record("b")], "all_products")
            .unwrap();
        let parsed: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        assert_eq!(parsed[1]["name"], "b");
        assert_eq!(parsed[1]["source_config"]["url"], "page.html");
    }

    #[test]
    fn provenance_replaces_a_clashing_field() {
        let mut fields = ExtractionResult::new();
        fields.insert(SOURCE_CONFIG_KEY, FieldValue::Single(Some("x".to_string())));
        let record = ProductRecord::new(fields, json!({"name": "n"}));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"source_config": {"name": "n"}})
        );
    }

    #[test]
    fn file_stems() {
        assert_eq!(file_stem_for("Acme Kettle KT-2000"), "acme_kettle_kt_2000");
        assert_eq!(file_stem_for("  --Widget!! "), "widget");
        assert_eq!(file_stem_for("Чайник"), "record");
        assert_eq!(file_stem_for(""), "record");
    }
}
