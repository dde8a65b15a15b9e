// ABOUTME: Integration tests running a realistic rule set against a product page fixture.
// ABOUTME: Covers totality, isolation, idempotence and degradation on broken input.

use harvest_extract::{
    extract, extract_html, extract_with_faults, Document, ExtractionResult, FieldFault,
    FieldRule, FieldRuleSet, FieldValue,
};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use std::fs;

#[derive(Debug, Deserialize)]
struct RulesFile {
    data_points: FieldRuleSet,
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn load_html() -> String {
    let path = fixture_path("product.html");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
}

fn load_rules() -> FieldRuleSet {
    let path = fixture_path("product_rules.json");
    let content =
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    let file: RulesFile =
        serde_json::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e));
    file.data_points
}

fn keys(result: &ExtractionResult) -> Vec<String> {
    result.keys().map(str::to_string).collect()
}

#[test]
fn product_page_extracts_every_field() {
    let result = extract_html(&load_html(), &load_rules());

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "name": "Электрический чайник KT-2000",
            "sku": "KT-2000",
            "price": "₽ 2 490",
            "stock": "В наличии",
            "og_image": "https://shop.example/img/kettle-og.jpg",
            "images": ["/img/kettle-1.jpg", "/img/kettle-2.jpg"],
            "image_alts": ["front", "side", "placeholder"],
            "features": ["1.7 л", "2200 Вт", "Нержавеющая сталь"],
            "description": ["Быстро закипает.", "Автоотключение."],
            "rating": null,
            "reviews": [],
            "broken": null,
            "unsupported": [],
            "unset": null
        })
    );
}

#[test]
fn result_keys_match_rule_keys() {
    let rules = load_rules();
    let expected: Vec<String> = rules.iter().map(|(k, _)| k.to_string()).collect();

    let page = load_html();
    for html in [page.as_str(), "", "<p>nothing relevant</p>"] {
        let result = extract_html(html, &rules);
        assert_eq!(keys(&result), expected);
    }
}

#[test]
fn faults_are_reported_only_for_bad_rules() {
    let doc = Document::parse(&load_html());
    let extraction = extract_with_faults(&doc, &load_rules());

    let faulty: Vec<&str> = extraction.faults.keys().map(String::as_str).collect();
    assert_eq!(faulty, vec!["broken", "unset", "unsupported"]);
    assert!(matches!(
        extraction.faults.get("broken"),
        Some(FieldFault::InvalidSelector { .. })
    ));
    assert_eq!(extraction.result, extract(&doc, &load_rules()));
}

#[test]
fn extraction_is_idempotent() {
    let html = load_html();
    let rules = load_rules();

    let first = extract_html(&html, &rules);
    let second = extract_html(&html, &rules);
    assert_eq!(first, second);

    let doc = Document::parse(&html);
    assert_eq!(extract(&doc, &rules), extract(&doc, &rules));
    assert_eq!(extract(&doc, &rules), first);
}

#[test]
fn truncated_html_degrades_gracefully() {
    let html = load_html();
    let cut = html
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i < html.len() / 2)
        .last()
        .unwrap_or(0);
    let truncated = &html[..cut];

    let result = extract_html(truncated, &load_rules());
    assert_eq!(result.len(), load_rules().len());
    assert_eq!(
        result.get("name").and_then(|v| v.as_single()),
        Some("Электрический чайник KT-2000")
    );
    assert_eq!(result.get("description"), Some(&FieldValue::Multi(vec![])));
}

#[test]
fn garbage_input_yields_empty_forms() {
    let rules: FieldRuleSet = [
        ("title", FieldRule::css("h1")),
        ("links", FieldRule::xpath("//a/@href").multi(true)),
        ("items", FieldRule::css("li").multi(true)),
    ]
    .into_iter()
    .collect();

    for input in ["", "\u{0}\u{1}\u{2}\u{fffd}\u{fffd}", "<<<>>>", "</div></body>"] {
        let result = extract_html(input, &rules);
        assert_eq!(result.get("title"), Some(&FieldValue::Single(None)));
        assert_eq!(result.get("links"), Some(&FieldValue::Multi(vec![])));
        assert_eq!(result.get("items"), Some(&FieldValue::Multi(vec![])));
    }
}

#[test]
fn css_and_xpath_agree_on_document_order() {
    let html = r#"
        <div><a href="/1">one</a></div>
        <a href="/2">two</a>
        <div><div><a href="/3">three</a></div></div>
    "#;
    let rules: FieldRuleSet = [
        ("css", FieldRule::css("a::attr(href)").multi(true)),
        ("xpath", FieldRule::xpath("//a/@href").multi(true)),
        ("text", FieldRule::css("a").multi(true)),
    ]
    .into_iter()
    .collect();

    let result = extract_html(html, &rules);
    let hrefs = FieldValue::Multi(vec!["/1".into(), "/2".into(), "/3".into()]);
    assert_eq!(result.get("css"), Some(&hrefs));
    assert_eq!(result.get("xpath"), Some(&hrefs));
    assert_eq!(
        result.get("text"),
        Some(&FieldValue::Multi(vec![
            "one".into(),
            "two".into(),
            "three".into()
        ]))
    );
}

#[test]
fn documents_can_be_processed_on_many_threads() {
    let html = load_html();
    let rules = load_rules();
    let expected = extract_html(&html, &rules);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| extract_html(&html, &rules)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
