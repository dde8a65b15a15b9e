// ABOUTME: XPath evaluation over an sxd-document mirror of the parsed HTML tree.
// ABOUTME: Attribute and text nodes become string matches; element nodes become node matches.

//! XPath support.
//!
//! The HTML5 tree built by `scraper` is copied into an `sxd_document::Package`
//! with elements placed in no namespace, so that expressions such as
//! `//div[@class='price']` work without namespace prefixes. Expressions are
//! evaluated with the root `<html>` element as the context node, so relative
//! paths such as `body/div` resolve from it.
//!
//! sxd-xpath walks descendants recursively, so documents nested deeper than
//! [`MAX_DEPTH`] get no XPath view at all.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use sxd_document::dom;
use sxd_document::Package;
use sxd_xpath::nodeset::Node as XNode;
use sxd_xpath::{Context, Factory, Value};

use crate::document::Match;
use crate::error::FieldFault;

/// Deepest element nesting the XPath view accepts.
pub const MAX_DEPTH: usize = 1024;

/// Copies the parsed HTML tree into a new XPath-capable package.
///
/// Returns `None` when elements are nested deeper than [`MAX_DEPTH`].
pub fn mirror(html: &Html) -> Option<Package> {
    let package = Package::new();
    {
        let doc = package.as_document();
        let mut pending: Vec<(NodeRef<'_, Node>, dom::Element<'_>, usize)> = Vec::new();

        for child in html.tree.root().children() {
            match child.value() {
                Node::Element(el) => {
                    let target = new_element(&doc, el);
                    doc.root().append_child(target);
                    pending.push((child, target, 1));
                }
                Node::Comment(comment) => {
                    doc.root().append_child(doc.create_comment(comment));
                }
                _ => {}
            }
        }

        // Children are appended in order when their parent is visited, so an
        // explicit stack keeps document order without recursing on deep trees.
        while let Some((node, parent, depth)) = pending.pop() {
            for child in node.children() {
                match child.value() {
                    Node::Element(el) => {
                        if depth >= MAX_DEPTH {
                            return None;
                        }
                        let target = new_element(&doc, el);
                        parent.append_child(target);
                        pending.push((child, target, depth + 1));
                    }
                    Node::Text(text) => {
                        parent.append_child(doc.create_text(text));
                    }
                    Node::Comment(comment) => {
                        parent.append_child(doc.create_comment(comment));
                    }
                    _ => {}
                }
            }
        }
    }
    Some(package)
}

fn new_element<'d>(doc: &dom::Document<'d>, el: &scraper::node::Element) -> dom::Element<'d> {
    let target = doc.create_element(el.name());
    for (name, value) in el.attrs() {
        target.set_attribute_value(name, value);
    }
    target
}

/// Evaluates an XPath expression with the root element as context node.
///
/// Syntax errors are reported as [`FieldFault::InvalidSelector`], failures while
/// evaluating (unknown functions, bad arguments) as [`FieldFault::Evaluation`].
pub fn evaluate<'d>(doc: &'d dom::Document<'d>, expr: &str) -> Result<Vec<Match>, FieldFault> {
    let xpath = Factory::new()
        .build(expr)
        .map_err(|e| FieldFault::invalid(expr, e))?
        .ok_or_else(|| FieldFault::invalid(expr, "empty expression"))?;

    let context = Context::new();
    let root = doc.root();
    let element = root.children().into_iter().find_map(|child| child.element());
    let value = match element {
        Some(element) => xpath.evaluate(&context, element),
        None => xpath.evaluate(&context, root),
    }
    .map_err(|e| FieldFault::evaluation(expr, e))?;

    let matches = match value {
        Value::Nodeset(nodes) => nodes.document_order().into_iter().map(to_match).collect(),
        Value::String(s) => vec![Match::Text(s)],
        Value::Number(n) => vec![Match::Text(format_number(n))],
        Value::Boolean(b) => vec![Match::Text(b.to_string())],
    };
    Ok(matches)
}

fn to_match(node: XNode<'_>) -> Match {
    match node {
        XNode::Attribute(attr) => Match::Text(attr.value().to_string()),
        XNode::Text(text) => Match::Text(text.text().to_string()),
        other => Match::Node(other.string_value()),
    }
}

/// Formats an XPath number the way XPath's `string()` does for common values.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
