//! Document - High-level document API

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an `html > head + body` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // fresh nodes under a fresh root cannot fail
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Re-resolve the cached `<html>`, `<head>` and `<body>` references.
    ///
    /// Call after building the tree by hand or after the parser is done.
    pub fn finalize(&mut self) {
        self.html_element = self
            .tree
            .element_children(self.tree.root())
            .find(|&n| self.tree.local_name(n) == Some("html"))
            .unwrap_or(NodeId::NONE);
        let child_named = |tag: &str| {
            self.tree
                .element_children(self.html_element)
                .find(|&n| self.tree.local_name(n) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };
        let head = child_named("head");
        let body = child_named("body");
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.head()
            .and_then(|head| {
                self.tree
                    .element_children(head)
                    .find(|&n| self.tree.local_name(n) == Some("title"))
            })
            .map(|title| self.tree.text_content(title))
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.live(self.html_element)
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.live(self.head_element)
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.live(self.body_element)
    }

    fn live(&self, id: NodeId) -> Option<NodeId> {
        self.tree.is_connected(id).then_some(id)
    }

    /// Get element by ID (first match in document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tree.local_name(html), Some("html"));
        assert_eq!(doc.tree.parent(doc.body().unwrap()), Some(html));
        assert_eq!(doc.url(), "https://example.com/");
    }

    #[test]
    fn test_finalize_and_lookup() {
        let mut doc = Document::empty("about:blank");
        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let div = tree.create_element("div");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, body).unwrap();
        tree.append_child(body, div).unwrap();
        tree.set_attribute(div, "id", "main").unwrap();
        assert_eq!(doc.body(), None);

        doc.finalize();
        assert_eq!(doc.body(), Some(body));
        assert_eq!(doc.head(), None);
        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id("nope"), None);
    }

    #[test]
    fn test_title() {
        let mut doc = Document::new("about:blank");
        let head = doc.head().unwrap();
        let title = doc.tree.create_element("title");
        let text = doc.tree.create_text("Inspector");
        doc.tree.append_child(head, title).unwrap();
        doc.tree.append_child(title, text).unwrap();
        assert_eq!(doc.title(), "Inspector");
    }
}
