//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into a `fos_dom` tree. The
//! conversion walks the RcDom with an explicit stack so deeply nested
//! markup cannot overflow the call stack.

use std::io::Read;

use fos_dom::{Document, DomTree, ElementData, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!(url, "parsing HTML document");
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        self.convert(&dom, url)
    }

    /// Parse UTF-8 HTML from a reader
    pub fn parse_reader<R: Read>(&self, mut reader: R, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!(url, "parsing HTML stream");
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut reader)?;
        Ok(self.convert(&dom, url))
    }

    fn convert(&self, dom: &RcDom, url: &str) -> Document {
        let mut document = Document::empty(url);
        let root = document.tree().root();
        let tree = document.tree_mut();

        let mut stack: Vec<(Handle, NodeId)> = dom
            .document
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), root))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let Some(id) = self.convert_node(&handle, tree) else {
                continue;
            };
            if let Err(err) = tree.append_child(parent, id) {
                tracing::warn!(%err, "dropping node the tree refused");
                continue;
            }
            stack.extend(
                handle
                    .children
                    .borrow()
                    .iter()
                    .rev()
                    .map(|child| (child.clone(), id)),
            );
        }

        document.finalize();
        tracing::debug!(nodes = document.tree().len(), "parsed document");
        document
    }

    /// Create the detached counterpart of one RcDom node
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
        match &handle.data {
            RcNodeData::Doctype { name, .. } => Some(tree.create_doctype(name)),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    None
                } else {
                    Some(tree.create_text(&text))
                }
            }
            RcNodeData::Comment { contents } => Some(tree.create_comment(contents)),
            RcNodeData::Element { name, attrs, .. } => {
                let mut elem = ElementData::new(&name.local);
                for attr in attrs.borrow().iter() {
                    elem.set_attr(&attr.name.local, &attr.value);
                }
                Some(tree.create_element_with(elem))
            }
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html);

        assert_eq!(doc.title(), "Test");
        let body = doc.body().unwrap();
        let p = doc.tree().first_element_child(body).unwrap();
        assert_eq!(doc.tree().local_name(p), Some("p"));
        assert_eq!(doc.tree().text_content(p), "Hello");
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::new().parse(html);

        // Even fragments get wrapped in html/head/body by html5ever
        assert!(doc.head().is_some());
        let body = doc.body().unwrap();
        assert_eq!(doc.tree().element_children(body).count(), 1);
    }

    #[test]
    fn test_whitespace_text_dropped() {
        let doc = HtmlParser::new().parse("<body>\n  <div>a</div>\n  <div>b</div>\n</body>");
        let body = doc.body().unwrap();
        assert_eq!(doc.tree().children(body).count(), 2);
    }

    #[test]
    fn test_parse_reader() {
        let doc = HtmlParser::new()
            .parse_reader("<p id=x>hi</p>".as_bytes(), "https://example.com/")
            .unwrap();
        assert_eq!(doc.url(), "https://example.com/");
        assert!(doc.get_element_by_id("x").is_some());
    }
}
