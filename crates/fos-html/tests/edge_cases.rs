//! Edge case tests for fos-html
//!
//! Degenerate input the inspector may be pointed at.

use fos_html::{HtmlParser, parse};

// ============================================================================
// DEGENERATE INPUT
// ============================================================================

#[test]
fn test_parse_null_bytes() {
    let doc = parse("<p>a\0b</p>");
    assert!(doc.body().is_some());
}

#[test]
fn test_parse_only_whitespace() {
    let doc = parse("   \n\t  ");
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().children(body).count(), 0);
}

#[test]
fn test_parse_only_doctype() {
    let doc = parse("<!DOCTYPE html>");
    let tree = doc.tree();
    let first = tree.first_child(tree.root()).unwrap();
    assert!(!tree.is_element(first));
    assert!(doc.document_element().is_some());
}

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse("<div><span><b>text");
    let tree = doc.tree();
    let names: Vec<_> = tree
        .descendants(doc.body().unwrap())
        .filter_map(|n| tree.local_name(n))
        .collect();
    assert_eq!(names, vec!["div", "span", "b"]);
}

#[test]
fn test_parse_orphan_closing_tag() {
    let doc = parse("</div><p>x</p>");
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().element_children(body).count(), 1);
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test]
fn test_parse_attribute_no_value() {
    let doc = parse("<input id=i disabled>");
    let input = doc.get_element_by_id("i").unwrap();
    assert_eq!(doc.tree().element(input).unwrap().get_attr("disabled"), Some(""));
}

#[test]
fn test_parse_attribute_case_folded() {
    let doc = parse("<DIV ID=Main CLASS='A b'></DIV>");
    let div = doc.get_element_by_id("Main").unwrap();
    let data = doc.tree().element(div).unwrap();
    assert_eq!(data.local_name, "div");
    assert_eq!(data.classes(), &["A", "b"]);
}

#[test]
fn test_parse_attribute_special_chars() {
    let doc = parse(r#"<a id="x" href="/path?a=1&amp;b=2#frag">l</a>"#);
    let a = doc.get_element_by_id("x").unwrap();
    assert_eq!(doc.tree().element(a).unwrap().get_attr("href"), Some("/path?a=1&b=2#frag"));
}

#[test]
fn test_parse_duplicate_ids() {
    let doc = parse(r#"<p id="dup">1</p><p id="dup">2</p>"#);
    let first = doc.get_element_by_id("dup").unwrap();
    assert_eq!(doc.tree().text_content(first), "1");
}

// ============================================================================
// STRESS
// ============================================================================

#[test]
fn test_parse_deeply_nested() {
    let depth = 2000;
    let html = "<div>".repeat(depth) + &"</div>".repeat(depth);
    let doc = HtmlParser::new().parse(&html);
    let tree = doc.tree();
    // html5ever caps nesting, but whatever it builds must be walkable
    let divs = tree
        .descendants(tree.root())
        .filter(|&n| tree.local_name(n) == Some("div"))
        .count();
    assert!(divs > 0);
}

#[test]
fn test_parse_many_siblings() {
    let html = "<ul>".to_string() + &"<li></li>".repeat(5000) + "</ul>";
    let doc = parse(&html);
    let tree = doc.tree();
    let ul = tree.first_element_child(doc.body().unwrap()).unwrap();
    assert_eq!(tree.element_children(ul).count(), 5000);
}

#[test]
fn test_parse_reader_invalid_utf8_is_lossy() {
    let bytes: &[u8] = b"<p id=\"x\">\xff</p>";
    let doc = HtmlParser::new().parse_reader(bytes, "about:blank").unwrap();
    assert!(doc.get_element_by_id("x").is_some());
}
