// ABOUTME: Per-field fault type for the extraction engine.
// ABOUTME: Faults are collapsed to empty-form results and only kept for diagnostics.

use thiserror::Error;

/// Why a single field produced its empty form.
///
/// A fault never aborts extraction of other fields; [`crate::extract`] drops it
/// after logging, [`crate::extract_with_faults`] hands it back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldFault {
    /// The rule has no selector, or an empty one.
    #[error("no selector configured")]
    MissingSelector,

    /// The rule names a selector language the engine does not know.
    #[error("unsupported selector language: {0}")]
    UnsupportedLanguage(String),

    /// The CSS selector or XPath expression could not be parsed.
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The XPath expression failed while being evaluated.
    #[error("evaluation of {selector:?} failed: {reason}")]
    Evaluation { selector: String, reason: String },
}

impl FieldFault {
    /// Creates an InvalidSelector fault.
    pub fn invalid(selector: impl Into<String>, reason: impl ToString) -> Self {
        FieldFault::InvalidSelector {
            selector: selector.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an Evaluation fault.
    pub fn evaluation(selector: impl Into<String>, reason: impl ToString) -> Self {
        FieldFault::Evaluation {
            selector: selector.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for configuration omissions (missing selector or unknown language),
    /// as opposed to selectors that failed to parse or evaluate.
    pub fn is_omission(&self) -> bool {
        matches!(
            self,
            FieldFault::MissingSelector | FieldFault::UnsupportedLanguage(_)
        )
    }
}
