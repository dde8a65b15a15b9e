// ABOUTME: Field rule data models: selector, selector language and cardinality per named field.
// ABOUTME: Deserializes from the `data_points` configuration shape and dispatches to CSS or XPath.

//! Declarative field rules.
//!
//! A rule is written in configuration as
//! `{"selector": "img::attr(src)", "type": "css", "multi": false}` where `type`
//! and `multi` are optional. Unknown `type` values are kept as
//! [`LanguageTag::Unsupported`] rather than rejected, so that one odd rule cannot
//! fail the whole rule set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Match};
use crate::error::FieldFault;

/// Selector languages the engine can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorLanguage {
    /// CSS selector, optionally suffixed with `::attr(name)`.
    Css,
    /// XPath 1.0 expression.
    XPath,
}

impl SelectorLanguage {
    /// The configuration name of this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorLanguage::Css => "css",
            SelectorLanguage::XPath => "xpath",
        }
    }

    /// Evaluates `selector` against `doc` in this language.
    pub fn evaluate(&self, doc: &Document, selector: &str) -> Result<Vec<Match>, FieldFault> {
        match self {
            SelectorLanguage::Css => doc.select_css(selector),
            SelectorLanguage::XPath => doc.select_xpath(selector),
        }
    }
}

/// The `type` of a rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LanguageTag {
    Supported(SelectorLanguage),
    Unsupported(String),
}

impl Default for LanguageTag {
    fn default() -> Self {
        LanguageTag::Supported(SelectorLanguage::Css)
    }
}

impl From<String> for LanguageTag {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "css" => LanguageTag::Supported(SelectorLanguage::Css),
            "xpath" => LanguageTag::Supported(SelectorLanguage::XPath),
            _ => LanguageTag::Unsupported(value),
        }
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        match tag {
            LanguageTag::Supported(lang) => lang.as_str().to_string(),
            LanguageTag::Unsupported(name) => name,
        }
    }
}

impl From<SelectorLanguage> for LanguageTag {
    fn from(lang: SelectorLanguage) -> Self {
        LanguageTag::Supported(lang)
    }
}

/// Configuration for extracting a single named field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldRule {
    /// CSS selector or XPath expression. Absent or empty yields the empty form.
    #[serde(default)]
    pub selector: Option<String>,
    /// Selector language, `css` when omitted.
    #[serde(default, rename = "type")]
    pub language: LanguageTag,
    /// Whether the field yields every match (a list) or only the first one.
    #[serde(default)]
    pub multi: bool,
}

impl FieldRule {
    /// A single-valued CSS rule.
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            language: SelectorLanguage::Css.into(),
            multi: false,
        }
    }

    /// A single-valued XPath rule.
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            language: SelectorLanguage::XPath.into(),
            multi: false,
        }
    }

    /// Sets the cardinality of the rule.
    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// Overrides the selector language.
    pub fn language(mut self, language: impl Into<LanguageTag>) -> Self {
        self.language = language.into();
        self
    }

    /// The selector, if present and non-empty.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref().filter(|s| !s.is_empty())
    }
}

/// Named field rules, one output entry per rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRuleSet {
    rules: BTreeMap<String, FieldRule>,
}

impl FieldRuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for `name`.
    pub fn insert(&mut self, name: impl Into<String>, rule: FieldRule) -> Option<FieldRule> {
        self.rules.insert(name.into(), rule)
    }

    /// Looks up the rule for `name`.
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    /// Iterates rules in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldRule)> for FieldRuleSet {
    fn from_iter<I: IntoIterator<Item = (K, FieldRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
