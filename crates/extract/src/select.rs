// ABOUTME: CSS selector evaluation for extracting node text and attribute values from HTML.
// ABOUTME: Understands a trailing `::attr(name)` pseudo-element as a request for attribute values.

//! CSS selection.
//!
//! Key behaviors:
//! - A plain selector yields one [`Match::Node`] per matched element, in
//!   document order, carrying the element's full descendant text.
//! - `selector::attr(name)` yields one [`Match::Text`] per matched element that
//!   has the attribute; elements without it contribute nothing.
//! - An unparsable selector is reported as [`FieldFault::InvalidSelector`].

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::document::Match;
use crate::error::FieldFault;

static ATTR_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*?)::attr\(\s*([^()\s]+)\s*\)\s*$").unwrap());

/// Splits `img::attr(src)` into `("img", Some("src"))`.
pub fn split_attr_suffix(selector: &str) -> (&str, Option<&str>) {
    match ATTR_SUFFIX_RE.captures(selector) {
        Some(caps) => {
            let css = caps.get(1).map_or("", |m| m.as_str());
            let attr = caps.get(2).map(|m| m.as_str());
            (css, attr)
        }
        None => (selector, None),
    }
}

/// Evaluates a CSS selector against a parsed document.
pub fn select(html: &Html, selector: &str) -> Result<Vec<Match>, FieldFault> {
    let (css, attr) = split_attr_suffix(selector);
    let parsed = Selector::parse(css).map_err(|e| FieldFault::invalid(selector, e))?;

    let matches = match attr {
        Some(attr) => html
            .select(&parsed)
            .filter_map(|el| el.value().attr(attr))
            .map(|v| Match::Text(v.to_string()))
            .collect(),
        None => html
            .select(&parsed)
            .map(|el| Match::Node(el.text().collect()))
            .collect(),
    };
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Test Page</title></head>
        <body>
            <h1>  Main <em>Title</em>  </h1>
            <img class="hero" src="  /images/hero.jpg " alt="Hero Image">
            <img class="thumb" alt="Thumbnail">
            <img class="blank" src="">
            <ul class="items">
                <li>Item One</li>
                <li></li>
                <li>Item Three</li>
            </ul>
        </body>
        </html>
    "#;

    fn parse_html() -> Html {
        Html::parse_document(SAMPLE_HTML)
    }

    #[test]
    fn test_split_attr_suffix() {
        assert_eq!(split_attr_suffix("img::attr(src)"), ("img", Some("src")));
        assert_eq!(
            split_attr_suffix("meta[property='og:title']::attr( content )"),
            ("meta[property='og:title']", Some("content"))
        );
        assert_eq!(split_attr_suffix("div.price"), ("div.price", None));
        assert_eq!(split_attr_suffix("a::attr()"), ("a::attr()", None));
    }

    #[test]
    fn test_node_matches_carry_descendant_text() {
        let html = parse_html();
        let matches = select(&html, "h1").unwrap();
        assert_eq!(matches, vec![Match::Node("  Main Title  ".to_string())]);
    }

    #[test]
    fn test_node_matches_keep_document_order_and_empties() {
        let html = parse_html();
        let matches = select(&html, "ul.items li").unwrap();
        assert_eq!(
            matches,
            vec![
                Match::Node("Item One".to_string()),
                Match::Node(String::new()),
                Match::Node("Item Three".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_values_are_raw_strings() {
        let html = parse_html();
        let matches = select(&html, "img::attr(src)").unwrap();
        // img.thumb has no src and contributes nothing; img.blank has an empty one
        assert_eq!(
            matches,
            vec![
                Match::Text("  /images/hero.jpg ".to_string()),
                Match::Text(String::new()),
            ]
        );
    }

    #[test]
    fn test_no_match_is_empty_not_an_error() {
        let html = parse_html();
        assert!(select(&html, "section.nonexistent").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_selector_is_a_fault() {
        let html = parse_html();
        let err = select(&html, "[[[invalid").unwrap_err();
        assert!(matches!(err, FieldFault::InvalidSelector { ref selector, .. } if selector == "[[[invalid"));
    }

    #[test]
    fn test_unknown_pseudo_element_is_a_fault() {
        let html = parse_html();
        assert!(select(&html, "p::text").is_err());
    }
}
