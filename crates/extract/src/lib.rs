// ABOUTME: Main library entry point for the harvest extraction engine.
// ABOUTME: Re-exports the public API: Document, FieldRule, FieldRuleSet, extract, ExtractionResult, FieldFault.

//! Harvest - declarative field extraction from HTML documents.
//!
//! A [`FieldRuleSet`] maps field names to selectors (CSS or XPath). Evaluating
//! it against a parsed [`Document`] yields an [`ExtractionResult`] with exactly
//! one entry per rule. A rule that cannot be evaluated degrades to its empty
//! form (`null` or `[]`) without affecting the other fields.
//!
//! # Example
//!
//! ```
//! use harvest_extract::{extract_html, FieldRule, FieldRuleSet};
//!
//! let mut rules = FieldRuleSet::new();
//! rules.insert("title", FieldRule::css("h1"));
//! rules.insert("images", FieldRule::xpath("//img/@src").multi(true));
//!
//! let result = extract_html("<h1> Widget </h1><img src='/a.png'>", &rules);
//! assert_eq!(result.get("title").and_then(|v| v.as_single()), Some("Widget"));
//! ```

pub mod document;
pub mod error;
pub mod extract;
pub mod result;
pub mod rules;
pub mod select;
pub mod xpath;

pub use crate::document::{Document, Match};
pub use crate::error::FieldFault;
pub use crate::extract::{extract, extract_html, extract_with_faults, Extraction};
pub use crate::result::{ExtractionResult, FieldValue};
pub use crate::rules::{FieldRule, FieldRuleSet, LanguageTag, SelectorLanguage};
