//! Comprehensive tests for fos-html
//!
//! Parsing into the arena DOM: structure, attributes and text.

use fos_html::HtmlParser;

#[test]
fn test_parse_minimal_html() {
    let doc = HtmlParser::new().parse("");
    assert!(doc.tree().len() >= 1, "Even empty HTML should have root");
    assert!(doc.body().is_some(), "html5ever always synthesizes a body");
}

#[test]
fn test_parse_text_only() {
    let doc = HtmlParser::new().parse("Hello World");
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().text_content(body), "Hello World");
}

#[test]
fn test_parse_nested_structure() {
    let html = r#"
        <html>
            <head>
                <title>Test Page</title>
                <meta charset="utf-8">
            </head>
            <body>
                <div id="container">
                    <h1>Welcome</h1>
                    <p class="intro">This is a test.</p>
                    <ul>
                        <li>Item 1</li>
                        <li>Item 2</li>
                        <li>Item 3</li>
                    </ul>
                </div>
            </body>
        </html>
    "#;

    let doc = HtmlParser::new().parse(html);
    let tree = doc.tree();
    assert_eq!(doc.title(), "Test Page");
    let container = doc.get_element_by_id("container").unwrap();
    let tags: Vec<_> = tree
        .element_children(container)
        .filter_map(|n| tree.local_name(n))
        .collect();
    assert_eq!(tags, vec!["h1", "p", "ul"]);
    let ul = tree.last_element_child(container).unwrap();
    assert_eq!(tree.element_children(ul).count(), 3);
}

#[test]
fn test_parse_malformed_html() {
    // HTML5 parser should handle malformed HTML gracefully
    let html = r#"
        <div>
            <p>Unclosed paragraph
            <span>Unclosed span
        </div>
        <p>Another paragraph without closing
    "#;

    let doc = HtmlParser::new().parse(html);
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().element_children(body).count(), 2);
}

#[test]
fn test_parse_with_attributes() {
    let html = r#"
        <div id="main" class="container primary" data-value="123">
            <a href="https://example.com" target="_blank">Link</a>
        </div>
    "#;

    let doc = HtmlParser::new().parse(html);
    let tree = doc.tree();
    let main = doc.get_element_by_id("main").unwrap();
    let data = tree.element(main).unwrap();
    assert_eq!(data.classes(), &["container", "primary"]);
    assert_eq!(data.get_attr("data-value"), Some("123"));
    let a = tree.first_element_child(main).unwrap();
    assert_eq!(tree.element(a).unwrap().get_attr("href"), Some("https://example.com"));
}

#[test]
fn test_parse_script_and_style() {
    let html = r#"
        <html>
            <head>
                <style>.foo { color: blue; }</style>
                <script>var s = "<div>not parsed</div>";</script>
            </head>
            <body>
                <p>Content</p>
            </body>
        </html>
    "#;

    let doc = HtmlParser::new().parse(html);
    let tree = doc.tree();
    let head = doc.head().unwrap();
    let style = tree.first_element_child(head).unwrap();
    assert_eq!(tree.text_content(style), ".foo { color: blue; }");
    let script = tree.next_element_sibling(style).unwrap();
    assert_eq!(tree.first_element_child(script), None);
}

#[test]
fn test_parse_inline_style_attribute() {
    let doc = HtmlParser::new().parse(r#"<div id="d" style="display: block !important"></div>"#);
    let div = doc.get_element_by_id("d").unwrap();
    let style = doc.tree().element(div).unwrap().style();
    assert_eq!(style.get_property_value("display"), Some("block"));
    assert!(style.get_property_priority("display"));
}

#[test]
fn test_parse_entities() {
    let html = r#"<p>&lt;tag&gt; &amp; &#169;</p>"#;
    let doc = HtmlParser::new().parse(html);
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().text_content(body), "<tag> & ©");
}

#[test]
fn test_parse_comments() {
    let html = r#"
        <div>
            <!-- Another comment -->
            <p>Content</p>
        </div>
    "#;

    let doc = HtmlParser::new().parse(html);
    let tree = doc.tree();
    let div = tree.first_element_child(doc.body().unwrap()).unwrap();
    assert_eq!(tree.children(div).count(), 2);
    assert_eq!(tree.element_children(div).count(), 1);
}

#[test]
fn test_parse_large_document() {
    let mut html = String::from("<html><body>");
    for i in 0..1000 {
        html.push_str(&format!(
            r#"<div id="div-{}" class="item"><p>Paragraph {}</p></div>"#,
            i, i
        ));
    }
    html.push_str("</body></html>");

    let doc = HtmlParser::new().parse(&html);

    // 1000 divs, 1000 paragraphs, 1000 texts
    assert!(doc.tree().len() > 3000);
    assert!(doc.get_element_by_id("div-999").is_some());
}

#[test]
fn test_parse_with_url() {
    let doc = fos_html::parse_with_url("<p></p>", "https://example.org/page");
    assert_eq!(doc.url(), "https://example.org/page");
}
