//! Inspector configuration

use std::time::Duration;

use fos_dom::{DomTree, NodeId};

/// Inspector session configuration
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Delay between the first buffered mutation and the coalescing pass
    pub debounce: Duration,
    /// Tags that never appear in layouts or journals (non-visual elements)
    pub skip_tags: Vec<String>,
    /// Per-tag attribute used to narrow coarse selectors
    pub resource_attributes: Vec<(String, String)>,
    /// Selector of the designated root; also the anchor prefix of fine selectors
    pub root_selector: String,
    /// Class carried by the inspector's own injected elements
    pub session_token: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
            skip_tags: ["br", "link", "meta", "script", "style"]
                .into_iter()
                .map(String::from)
                .collect(),
            resource_attributes: [("a", "href"), ("iframe", "src"), ("img", "src"), ("object", "data")]
                .into_iter()
                .map(|(tag, attr)| (tag.to_string(), attr.to_string()))
                .collect(),
            root_selector: "body".to_string(),
            session_token: format!("fos-{}", uuid::Uuid::new_v4().simple()),
        }
    }
}

impl InspectorConfig {
    /// Config with a fixed session token (reproducible fingerprints)
    pub fn with_session(token: impl Into<String>) -> Self {
        Self {
            session_token: token.into(),
            ..Self::default()
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Disambiguating attribute for a tag, if any
    pub fn resource_attribute(&self, tag: &str) -> Option<&str> {
        self.resource_attributes
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, attr)| attr.as_str())
    }

    pub fn is_skipped_tag(&self, tag: &str) -> bool {
        self.skip_tags.iter().any(|t| t == tag)
    }

    /// Whether the element was injected by the inspector itself
    pub fn is_own_element(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.element(node)
            .is_some_and(|e| e.has_class(&self.session_token))
    }

    /// Whether a node is left out of layouts and journals, together with
    /// its subtree. Non-elements are always excluded.
    pub fn excludes(&self, tree: &DomTree, node: NodeId) -> bool {
        match tree.element(node) {
            Some(e) => self.is_skipped_tag(&e.local_name) || e.has_class(&self.session_token),
            None => true,
        }
    }
}
