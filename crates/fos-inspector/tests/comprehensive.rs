//! Comprehensive tests for fos-inspector
//!
//! Drives a session through the protocol verbs against parsed documents.

use std::time::{Duration, Instant};

use fos_dom::{Document, NodeId};
use fos_inspector::{
    DomLayoutResponse, FilterEntry, InspectorConfig, InspectorError, InspectorSession,
    JournalEntry, LayoutStatus, Nid, NullOverlay, Request, Response,
};

const DEBOUNCE: Duration = Duration::from_millis(100);

fn session() -> InspectorSession {
    let config = InspectorConfig::with_session("tok").with_debounce(DEBOUNCE);
    InspectorSession::new(config, Box::new(NullOverlay))
}

fn dom_layout(
    session: &mut InspectorSession,
    doc: &mut Document,
    fingerprint: Option<&str>,
    now: Instant,
) -> DomLayoutResponse {
    let request = Request::DomLayout {
        fingerprint: fingerprint.map(str::to_string),
    };
    match session.handle(doc, request, now).unwrap() {
        Some(Response::DomLayout(layout)) => layout,
        other => panic!("unexpected response {other:?}"),
    }
}

fn cook(session: &mut InspectorSession, doc: &mut Document, entries: &[(&Nid, &str)]) -> Vec<String> {
    let entries = entries
        .iter()
        .map(|(nid, selector)| FilterEntry {
            nid: (*nid).clone(),
            selector: selector.to_string(),
        })
        .collect();
    match session
        .handle(doc, Request::CookFilters { entries }, Instant::now())
        .unwrap()
    {
        Some(Response::Filters(filters)) => filters,
        other => panic!("unexpected response {other:?}"),
    }
}

fn verb(session: &mut InspectorSession, doc: &mut Document, request: Request) {
    assert!(session.handle(doc, request, Instant::now()).unwrap().is_none());
}

fn display(doc: &Document, node: NodeId) -> Option<(String, bool)> {
    let style = doc.tree().element(node)?.style();
    let value = style.get_property_value("display")?.to_string();
    Some((value, style.get_property_priority("display")))
}

fn nth_child(doc: &Document, parent: NodeId, n: usize) -> NodeId {
    doc.tree().element_children(parent).nth(n).unwrap()
}

// ============================================================================
// LAYOUT
// ============================================================================

#[test]
fn test_full_layout_scenario() {
    let mut doc = fos_html::parse(r#"<body><div id="x"><span class="a b"></span></div></body>"#);
    let mut session = session();
    let layout = dom_layout(&mut session, &mut doc, None, Instant::now());

    assert_eq!(layout.what, "domLayout");
    assert_eq!(layout.status, LayoutStatus::Full);
    let nodes = layout.layout.unwrap();
    let summary: Vec<_> = nodes.iter().map(|n| (n.lvl, n.sel.as_str(), n.cnt)).collect();
    assert_eq!(summary, vec![(0, "body", 2), (1, "div#x", 1), (2, "span.a.b", 0)]);
}

#[test]
fn test_incremental_after_insertion() {
    let mut doc = fos_html::parse(r#"<body><div id="x"><span class="a b"></span></div></body>"#);
    let mut session = session();
    let start = Instant::now();
    let full = dom_layout(&mut session, &mut doc, None, start);
    let nodes = full.layout.unwrap();
    let (div_nid, span_nid) = (nodes[1].nid.clone(), nodes[2].nid.clone());

    let div = doc.get_element_by_id("x").unwrap();
    let p = doc.tree_mut().create_element("p");
    doc.tree_mut().append_child(div, p).unwrap();
    session.poll(&mut doc, start);

    let layout = dom_layout(&mut session, &mut doc, Some(&full.fingerprint), start + DEBOUNCE);
    assert_eq!(layout.status, LayoutStatus::Incremental);
    assert_eq!(layout.fingerprint, full.fingerprint);
    let journal = layout.journal.unwrap();
    assert_eq!(journal.len(), 1);
    let JournalEntry::Addition { nid, parent, left } = &journal[0] else {
        panic!("expected an addition, got {:?}", journal[0]);
    };
    assert_eq!(parent, &div_nid);
    assert_eq!(left.as_ref(), Some(&span_nid));

    let nodes = layout.nodes.unwrap();
    let described = &nodes[nid];
    assert_eq!((described.lvl, described.sel.as_str(), described.cnt), (2, "p", 0));

    let after = dom_layout(&mut session, &mut doc, Some(&full.fingerprint), start + DEBOUNCE);
    assert_eq!(after.status, LayoutStatus::NoChange);
}

#[test]
fn test_journal_waits_for_debounce_window() {
    let mut doc = fos_html::parse("<main></main>");
    let mut session = session();
    let start = Instant::now();
    let fingerprint = dom_layout(&mut session, &mut doc, None, start).fingerprint;

    let body = doc.body().unwrap();
    let aside = doc.tree_mut().create_element("aside");
    doc.tree_mut().append_child(body, aside).unwrap();

    let early = dom_layout(&mut session, &mut doc, Some(&fingerprint), start);
    assert_eq!(early.status, LayoutStatus::NoChange);
    assert_eq!(session.next_deadline(), Some(start + DEBOUNCE));

    let almost = dom_layout(&mut session, &mut doc, Some(&fingerprint), start + DEBOUNCE / 2);
    assert_eq!(almost.status, LayoutStatus::NoChange);

    let due = dom_layout(&mut session, &mut doc, Some(&fingerprint), start + DEBOUNCE);
    assert_eq!(due.status, LayoutStatus::Incremental);
    assert!(session.next_deadline().is_none());
}

#[test]
fn test_fingerprint_mismatch_discards_pending_journal() {
    let mut doc = fos_html::parse("<main></main>");
    let mut session = session();
    let start = Instant::now();
    let first = dom_layout(&mut session, &mut doc, None, start);

    let body = doc.body().unwrap();
    let aside = doc.tree_mut().create_element("aside");
    doc.tree_mut().append_child(body, aside).unwrap();
    session.poll(&mut doc, start);
    assert!(session.poll(&mut doc, start + DEBOUNCE));

    let full = dom_layout(&mut session, &mut doc, Some("stale"), start + DEBOUNCE);
    assert_eq!(full.status, LayoutStatus::Full);
    assert_ne!(full.fingerprint, first.fingerprint);
    assert_eq!(full.layout.as_ref().map(Vec::len), Some(3));

    let next = dom_layout(&mut session, &mut doc, Some(&full.fingerprint), start + DEBOUNCE * 3);
    assert_eq!(next.status, LayoutStatus::NoChange);
}

#[test]
fn test_new_epoch_changes_identifiers() {
    let mut doc = fos_html::parse("<p></p>");
    let mut session = session();
    let now = Instant::now();
    let first = dom_layout(&mut session, &mut doc, None, now).layout.unwrap();
    let second = dom_layout(&mut session, &mut doc, None, now).layout.unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_ne!(a.nid, b.nid);
        assert_eq!(a.sel, b.sel);
    }
}

#[test]
fn test_layout_metadata() {
    let mut doc = fos_html::parse_with_url("<p></p>", "https://news.example.com/a/b?c=d");
    let mut session = session();
    let layout = dom_layout(&mut session, &mut doc, None, Instant::now());
    assert_eq!(layout.url, "https://news.example.com/a/b?c=d");
    assert_eq!(layout.hostname, "news.example.com");
}

#[test]
fn test_provenance_tags_layout_nodes() {
    let mut doc = fos_html::parse(
        r#"<head><style class="tok">.ad { display: none !important }</style></head>
           <body><div class="ad"></div><div class="content"></div></body>"#,
    );
    let mut session = session();
    let nodes = dom_layout(&mut session, &mut doc, None, Instant::now()).layout.unwrap();
    let filters: Vec<_> = nodes.iter().map(|n| n.filter.as_deref()).collect();
    assert_eq!(filters, vec![None, Some(".ad"), None]);
}

#[test]
fn test_layout_wire_format() {
    let mut doc = fos_html::parse(r#"<div id="x"></div>"#);
    let mut session = session();
    let json = session
        .handle_json(&mut doc, r#"{"what":"domLayout","fingerprint":null}"#, Instant::now())
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["status"], "full");
    assert_eq!(value["layout"][1]["sel"], "div#x");
    assert_eq!(value["layout"][1]["lvl"], 1);
    assert_eq!(value["layout"][0]["cnt"], 1);
    assert!(value["layout"][0].get("filter").is_none());
    assert!(value.get("journal").is_none());
}

// ============================================================================
// FILTER SELECTORS
// ============================================================================

#[test]
fn test_cook_filters_reverse_order() {
    let mut doc = fos_html::parse(r#"<div id="x"></div><ul><li></li><li></li></ul>"#);
    let mut session = session();
    let nodes = dom_layout(&mut session, &mut doc, None, Instant::now()).layout.unwrap();
    // body div#x ul li li
    let div = nodes[1].nid.clone();
    let second_li = nodes[4].nid.clone();

    let filters = cook(&mut session, &mut doc, &[(&div, "div#x"), (&second_li, "li")]);
    assert_eq!(filters, vec!["body > ul > li:nth-of-type(2)", "#x"]);
}

#[test]
fn test_cook_filters_round_trip() {
    let mut doc = fos_html::parse(
        r#"<section class="feed">
             <article class="post"><a href="/p/1?ref=x">one</a></article>
             <article class="post"><a href="/p/2?ref=x">two</a><img alt="promo" src="p.png"></article>
           </section>"#,
    );
    let mut session = session();
    let nodes = dom_layout(&mut session, &mut doc, None, Instant::now()).layout.unwrap();

    for node in &nodes {
        let filters = cook(&mut session, &mut doc, &[(&node.nid, node.sel.as_str())]);
        let matched = fos_inspector::elements_from_selector(doc.tree(), doc.tree().root(), &filters[0]);
        let picked: Vec<_> = matched
            .iter()
            .filter(|&&n| session.registry().lookup(n) == Some(&node.nid))
            .collect();
        assert_eq!(picked.len(), 1, "{} does not find {}", filters[0], node.sel);
        if node.sel != "body" {
            assert_eq!(matched.len(), 1, "{} is ambiguous", filters[0]);
        }
    }
}

#[test]
fn test_cook_filters_anchor_and_image_segments() {
    let mut doc = fos_html::parse(
        r#"<p><a href="/x?utm=1">x</a><a href="/y">y</a></p><p><img alt="logo"><img alt="logo"></p>"#,
    );
    let mut session = session();
    let nodes = dom_layout(&mut session, &mut doc, None, Instant::now()).layout.unwrap();
    // body p a a p img img
    let filters = cook(
        &mut session,
        &mut doc,
        &[(&nodes[2].nid, nodes[2].sel.as_str()), (&nodes[6].nid, nodes[6].sel.as_str())],
    );
    assert_eq!(
        filters,
        vec![
            r#"body > p:nth-of-type(2) > img[alt="logo"]:nth-of-type(2)"#,
            r#"body > p:nth-of-type(1) > a[href^="/x"]"#,
        ]
    );
}

// ============================================================================
// VISIBILITY VERBS
// ============================================================================

#[test]
fn test_toggle_nodes_and_reset() {
    let mut doc = fos_html::parse(r#"<div class="ad"></div><div class="ad" style="display: flex"></div>"#);
    let mut session = session();
    let nodes = dom_layout(&mut session, &mut doc, None, Instant::now()).layout.unwrap();
    let body = doc.body().unwrap();
    let (first, second) = (nth_child(&doc, body, 0), nth_child(&doc, body, 1));

    verb(
        &mut session,
        &mut doc,
        Request::ToggleNodes {
            selector: "div.ad".into(),
            nid: nodes[2].nid.to_string(),
            original: true,
            target: false,
        },
    );
    assert_eq!(session.highlights().picked, vec![second]);
    assert_eq!(display(&doc, first), None);
    assert_eq!(display(&doc, second), Some(("none".into(), false)));

    verb(
        &mut session,
        &mut doc,
        Request::ToggleNodes {
            selector: "div.ad".into(),
            nid: String::new(),
            original: true,
            target: false,
        },
    );
    assert_eq!(session.toggles().len(), 2);

    verb(&mut session, &mut doc, Request::ResetToggledNodes);
    assert_eq!(display(&doc, first), None);
    assert_eq!(display(&doc, second), Some(("flex".into(), false)));
    assert!(session.toggles().is_empty());
}

#[test]
fn test_show_interactive_previews() {
    let mut doc = fos_html::parse(r#"<div class="ad"></div><div class="keep" style="display: none"></div>"#);
    let mut session = session();
    dom_layout(&mut session, &mut doc, None, Instant::now());
    let body = doc.body().unwrap();
    let (ad, keep) = (nth_child(&doc, body, 0), nth_child(&doc, body, 1));

    verb(
        &mut session,
        &mut doc,
        Request::ShowInteractive {
            hide: ".ad".into(),
            unhide: ".keep".into(),
        },
    );
    assert_eq!(display(&doc, ad), Some(("none".into(), false)));
    assert_eq!(display(&doc, keep), Some(("initial".into(), true)));
    assert!(session.highlights().is_empty());

    // a new preview undoes the previous one first
    verb(
        &mut session,
        &mut doc,
        Request::ShowInteractive {
            hide: String::new(),
            unhide: String::new(),
        },
    );
    assert_eq!(display(&doc, ad), None);
    assert_eq!(display(&doc, keep), Some(("none".into(), false)));
}

#[test]
fn test_commit_filters_is_permanent() {
    let mut doc = fos_html::parse(r#"<div class="ad"></div><p></p>"#);
    let mut session = session();
    dom_layout(&mut session, &mut doc, None, Instant::now());
    let ad = nth_child(&doc, doc.body().unwrap(), 0);

    verb(
        &mut session,
        &mut doc,
        Request::CommitFilters {
            hide: ".ad".into(),
            unhide: String::new(),
        },
    );
    assert!(session.toggles().is_empty());
    verb(&mut session, &mut doc, Request::ResetToggledNodes);
    assert_eq!(display(&doc, ad), Some(("none".into(), false)));
}

#[test]
fn test_show_committed_highlights() {
    let mut doc = fos_html::parse(r#"<div class="ad"></div><div class="ad keep"></div>"#);
    let mut session = session();
    dom_layout(&mut session, &mut doc, None, Instant::now());
    let body = doc.body().unwrap();
    let (ad, keep) = (nth_child(&doc, body, 0), nth_child(&doc, body, 1));

    verb(
        &mut session,
        &mut doc,
        Request::ShowCommitted {
            hide: ".ad".into(),
            unhide: ".keep".into(),
        },
    );
    let lists = session.highlights();
    assert!(lists.picked.is_empty());
    assert_eq!(lists.hidden, vec![ad, keep]);
    assert_eq!(lists.unhidden, vec![keep]);
    assert_eq!(display(&doc, keep), Some(("initial".into(), true)));
    assert_eq!(display(&doc, ad), None);
}

#[test]
fn test_highlight_one_by_identifier() {
    let mut doc = fos_html::parse("<li></li><li></li><li></li>");
    let mut session = session();
    let nodes = dom_layout(&mut session, &mut doc, None, Instant::now()).layout.unwrap();
    let middle = nth_child(&doc, doc.body().unwrap(), 1);

    verb(
        &mut session,
        &mut doc,
        Request::HighlightOne {
            selector: "li".into(),
            nid: nodes[2].nid.to_string(),
            scroll_to: true,
        },
    );
    assert_eq!(session.highlights().picked, vec![middle]);

    verb(
        &mut session,
        &mut doc,
        Request::HighlightOne {
            selector: "li".into(),
            nid: String::new(),
            scroll_to: false,
        },
    );
    assert_eq!(session.highlights().picked.len(), 3);
}

// ============================================================================
// SHUTDOWN
// ============================================================================

#[test]
fn test_shutdown_restores_and_stops() {
    let mut doc = fos_html::parse(r#"<div class="ad"></div>"#);
    let mut session = session();
    dom_layout(&mut session, &mut doc, None, Instant::now());
    let ad = nth_child(&doc, doc.body().unwrap(), 0);
    verb(
        &mut session,
        &mut doc,
        Request::ShowInteractive {
            hide: ".ad".into(),
            unhide: String::new(),
        },
    );
    assert!(display(&doc, ad).is_some());

    verb(&mut session, &mut doc, Request::Shutdown);
    assert_eq!(display(&doc, ad), None);
    assert!(session.registry().is_empty());
    assert!(matches!(
        session.handle(&mut doc, Request::DomLayout { fingerprint: None }, Instant::now()),
        Err(InspectorError::ShutDown)
    ));
}
