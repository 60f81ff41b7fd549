//! Selector synthesis
//!
//! Two flavours of selector are derived from a node:
//!
//! - a *coarse* selector, one segment describing the node itself (tag, then
//!   id or classes, then a resource attribute). It finds the node's plausible
//!   look-alikes and is what layouts carry.
//! - a *fine* selector, built by climbing from the node towards the root and
//!   disambiguating each step with `:nth-of-type()` where needed. It is meant
//!   to be used as a standing filter rule.

use fos_css::{
    EscapeError, SelectorList, escape_identifier, escape_string, query_selector, query_selector_all,
};
use fos_dom::{DomTree, NodeId};

use crate::config::InspectorConfig;
use crate::registry::{IdentityRegistry, Nid};

/// Resolve `selector` below `scope`. Malformed selectors match nothing.
pub fn elements_from_selector(tree: &DomTree, scope: NodeId, selector: &str) -> Vec<NodeId> {
    match SelectorList::parse(selector) {
        Ok(list) => query_selector_all(tree, scope, &list),
        Err(err) => {
            tracing::trace!(selector, %err, "selector does not parse, no match");
            Vec::new()
        }
    }
}

/// Builds selectors for nodes of one tree
#[derive(Clone, Copy)]
pub struct SelectorSynthesizer<'a> {
    tree: &'a DomTree,
    config: &'a InspectorConfig,
}

impl<'a> SelectorSynthesizer<'a> {
    pub fn new(tree: &'a DomTree, config: &'a InspectorConfig) -> Self {
        Self { tree, config }
    }

    /// Single-segment selector for `node`: `tag#id`, else `tag.c1.c2`, plus
    /// the tag's resource attribute when present.
    ///
    /// URL-like attribute values lose their query string and fragment; when
    /// anything was cut the attribute becomes a prefix match.
    pub fn coarse_selector_of(&self, node: NodeId) -> Result<String, EscapeError> {
        let Some(element) = self.tree.element(node) else {
            return Ok(String::new());
        };
        let tag = element.local_name.as_str();
        let mut selector = escape_identifier(tag)?;

        match element.id().filter(|id| !id.is_empty()) {
            Some(id) => {
                selector.push('#');
                selector.push_str(&escape_identifier(id)?);
            }
            None => {
                for class in element.classes() {
                    selector.push('.');
                    selector.push_str(&escape_identifier(class)?);
                }
            }
        }

        if let Some(attr) = self.config.resource_attribute(tag) {
            let raw = element.get_attr(attr).unwrap_or_default();
            let cut = raw.find(['?', '#']).unwrap_or(raw.len());
            let value = &raw[..cut];
            if !value.trim().is_empty() {
                let op = if cut < raw.len() { "^=" } else { "=" };
                selector.push_str(&format!("[{attr}{op}\"{}\"]", escape_string(value)));
            }
        }
        Ok(selector)
    }

    /// One step of a fine selector: `#id`, else `.c1.c2`, else `tag`,
    /// narrowed by `href` (anchors, without query string) or `alt`
    /// (images), and indexed with `:nth-of-type()` when siblings share the
    /// same segment.
    pub fn node_segment(&self, node: NodeId) -> Result<String, EscapeError> {
        let Some(element) = self.tree.element(node) else {
            return Ok(String::new());
        };
        let tag = element.local_name.as_str();

        let mut segment = String::new();
        match element.id().filter(|id| !id.is_empty()) {
            Some(id) => {
                segment.push('#');
                segment.push_str(&escape_identifier(id)?);
            }
            None => {
                for class in element.classes() {
                    segment.push('.');
                    segment.push_str(&escape_identifier(class)?);
                }
            }
        }
        if segment.is_empty() {
            segment = escape_identifier(tag)?;
        }

        // a query string is cut off, leaving a prefix match
        let qualifier = match tag {
            "a" => element.get_attr("href").map(|href| match href.split_once('?') {
                Some((path, _)) => ("href", "^=", path),
                None => ("href", "=", href),
            }),
            "img" => element.get_attr("alt").map(|alt| ("alt", "=", alt)),
            _ => None,
        };
        if let Some((name, op, value)) = qualifier.filter(|(_, _, v)| !v.is_empty()) {
            segment.push_str(&format!("[{name}{op}\"{}\"]", escape_string(value)));
        }

        if let Some(parent) = self.tree.parent_element(node) {
            let scoped = format!(":scope > {segment}");
            if elements_from_selector(self.tree, parent, &scoped).len() > 1 {
                let index = 1 + self
                    .preceding_element_siblings(node)
                    .filter(|&s| self.tree.local_name(s) == Some(tag))
                    .count();
                if segment.starts_with(['#', '.']) {
                    segment.insert_str(0, &escape_identifier(tag)?);
                }
                segment.push_str(&format!(":nth-of-type({index})"));
            }
        }
        Ok(segment)
    }

    /// Best filter selector for the node registered as `nid` among the
    /// matches of `coarse`. Falls back to `coarse` when no match carries
    /// that identifier.
    pub fn fine_selector_from(
        &self,
        registry: &IdentityRegistry,
        nid: &Nid,
        coarse: &str,
    ) -> Result<String, EscapeError> {
        let tree = self.tree;
        let candidates = elements_from_selector(tree, tree.root(), coarse);
        let Some(target) = registry.find(&candidates, nid) else {
            return Ok(coarse.to_string());
        };

        let root = self.root_element();
        if Some(target) == root {
            return Ok(self.config.root_selector.clone());
        }

        let mut segments = Vec::new();
        let mut node = Some(target);
        let mut anchored = false;
        while let Some(current) = node {
            if Some(current) == root {
                anchored = true;
                break;
            }
            let segment = self.node_segment(current)?;
            let id_rooted = segment.starts_with('#');
            segments.push(segment);
            if id_rooted {
                break;
            }
            node = tree.parent_element(current);
        }
        segments.reverse();
        let fine = segments.join(" > ");

        if fine.starts_with('#') || !anchored {
            return Ok(fine);
        }
        if fine.starts_with('.') && elements_from_selector(tree, tree.root(), &fine).len() == 1 {
            return Ok(fine);
        }
        Ok(format!("{} > {}", self.config.root_selector, fine))
    }

    /// Matches of `selector` document-wide, minus the inspector's own
    /// elements. With a `nid`, only the match registered under it.
    pub fn select_nodes(
        &self,
        registry: &IdentityRegistry,
        selector: &str,
        nid: Option<&Nid>,
    ) -> Vec<NodeId> {
        let tree = self.tree;
        let nodes: Vec<_> = elements_from_selector(tree, tree.root(), selector)
            .into_iter()
            .filter(|&n| !self.config.is_own_element(tree, n))
            .collect();
        match nid {
            None => nodes,
            Some(nid) => registry.find(&nodes, nid).into_iter().collect(),
        }
    }

    /// The designated root element (first match of the root selector)
    pub fn root_element(&self) -> Option<NodeId> {
        let tree = self.tree;
        match SelectorList::parse(&self.config.root_selector) {
            Ok(list) => query_selector(tree, tree.root(), &list),
            Err(err) => {
                tracing::debug!(
                    selector = %self.config.root_selector,
                    %err,
                    "root selector does not parse"
                );
                None
            }
        }
    }

    fn preceding_element_siblings(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.tree.previous_element_sibling(node), move |&s| {
            self.tree.previous_element_sibling(s)
        })
    }
}
