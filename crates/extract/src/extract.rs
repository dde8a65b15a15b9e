// ABOUTME: Rule evaluator: applies every field rule to a document and normalizes the matches.
// ABOUTME: Each field is isolated; a failing rule yields its empty form and never aborts the others.

//! Rule evaluation.
//!
//! For every `(name, rule)` pair:
//! 1. no selector, or an unsupported language, yields the empty form;
//! 2. otherwise the selector is evaluated in the rule's language, and any
//!    evaluation fault is treated exactly like "no matches";
//! 3. matches are normalized (see [`Match::normalize`]) in the order the query
//!    engine returned them;
//! 4. `multi` rules keep every value, others keep only the first.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::document::{Document, Match};
use crate::error::FieldFault;
use crate::result::{ExtractionResult, FieldValue};
use crate::rules::{FieldRule, FieldRuleSet, LanguageTag};

/// An extraction result together with the faults that emptied some of its fields.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub faults: BTreeMap<String, FieldFault>,
}

/// Evaluates every rule against `doc`.
///
/// The result has exactly one entry per rule. Faults are logged at debug level
/// and otherwise discarded.
pub fn extract(doc: &Document, rules: &FieldRuleSet) -> ExtractionResult {
    extract_with_faults(doc, rules).result
}

/// Parses `html` and evaluates every rule against it.
pub fn extract_html(html: &str, rules: &FieldRuleSet) -> ExtractionResult {
    extract(&Document::parse(html), rules)
}

/// Like [`extract`], but also reports why fields fell back to their empty form.
///
/// A field that simply matched nothing has no fault.
pub fn extract_with_faults(doc: &Document, rules: &FieldRuleSet) -> Extraction {
    let mut extraction = Extraction::default();

    for (name, rule) in rules.iter() {
        let value = match evaluate_rule(doc, rule) {
            Ok(matches) => {
                let values = matches.into_iter().filter_map(Match::normalize).collect();
                FieldValue::from_values(values, rule.multi)
            }
            Err(fault) => {
                if fault.is_omission() {
                    trace!(field = name, %fault, "field skipped");
                } else {
                    debug!(field = name, %fault, "field evaluation failed");
                }
                extraction.faults.insert(name.to_string(), fault);
                FieldValue::empty(rule.multi)
            }
        };
        extraction.result.insert(name, value);
    }

    extraction
}

fn evaluate_rule(doc: &Document, rule: &FieldRule) -> Result<Vec<Match>, FieldFault> {
    let selector = rule.selector().ok_or(FieldFault::MissingSelector)?;
    match &rule.language {
        LanguageTag::Supported(lang) => lang.evaluate(doc, selector),
        LanguageTag::Unsupported(name) => Err(FieldFault::UnsupportedLanguage(name.clone())),
    }
}
