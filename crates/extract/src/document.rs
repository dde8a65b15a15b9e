// ABOUTME: Parsed HTML document supporting CSS selection and XPath evaluation.
// ABOUTME: The XPath view of the tree is built lazily, once per document.

use once_cell::unsync::OnceCell;
use scraper::Html;
use sxd_document::Package;

use crate::error::FieldFault;
use crate::{select, xpath};

/// A single raw match produced by a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    /// A value the query itself selected, e.g. an attribute or a text node.
    Text(String),
    /// A matched node, carrying its full descendant text in document order.
    Node(String),
}

impl Match {
    /// Normalizes the match into an output value.
    ///
    /// Selected strings are trimmed and always kept, even when empty. Node text is
    /// trimmed and dropped when nothing is left.
    pub fn normalize(self) -> Option<String> {
        match self {
            Match::Text(s) => Some(s.trim().to_string()),
            Match::Node(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

/// An owned, read-only parse of one HTML input.
///
/// Parsing never fails: broken markup is recovered by the HTML5 tree builder,
/// and input that is not HTML at all simply produces a near-empty tree.
pub struct Document {
    html: Html,
    xpath_tree: OnceCell<Option<Package>>,
}

impl Document {
    /// Parses an HTML document.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            xpath_tree: OnceCell::new(),
        }
    }

    /// The underlying HTML tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Evaluates a CSS selector, with optional `::attr(name)` suffix.
    pub fn select_css(&self, selector: &str) -> Result<Vec<Match>, FieldFault> {
        select::select(&self.html, selector)
    }

    /// Evaluates an XPath expression with the root element as context node.
    pub fn select_xpath(&self, expr: &str) -> Result<Vec<Match>, FieldFault> {
        match self.xpath_tree.get_or_init(|| xpath::mirror(&self.html)) {
            Some(package) => xpath::evaluate(&package.as_document(), expr),
            None => Err(FieldFault::evaluation(
                expr,
                format!("document nesting exceeds {} levels", xpath::MAX_DEPTH),
            )),
        }
    }
}

impl From<&str> for Document {
    fn from(html: &str) -> Self {
        Document::parse(html)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("errors", &self.html.errors.len())
            .field("xpath_tree_built", &self.xpath_tree.get().is_some())
            .finish()
    }
}
