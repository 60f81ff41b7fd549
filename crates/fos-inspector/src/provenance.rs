//! Style provenance
//!
//! The inspector's own `<style>` elements carry the session token as a
//! class. Their rule selectors are what the operator's filters currently
//! hide; a node matched by one of them is tagged with that selector.

use fos_css::{SelectorList, matches_selector, parse_stylesheet};
use fos_dom::{DomTree, NodeId};

use crate::config::InspectorConfig;

/// Rule selectors of the injected stylesheets, in document then source order
#[derive(Debug, Default)]
pub struct ProvenanceIndex {
    rules: Vec<(String, SelectorList)>,
}

impl ProvenanceIndex {
    /// Collect the rules of every injected `<style>` element of `tree`
    pub fn collect(tree: &DomTree, config: &InspectorConfig) -> Self {
        let mut rules = Vec::new();
        let sheets = tree.descendants(tree.root()).filter(|&n| {
            tree.local_name(n) == Some("style") && config.is_own_element(tree, n)
        });
        for sheet in sheets {
            let css = tree.text_content(sheet);
            let stylesheet = match parse_stylesheet(&css) {
                Ok(stylesheet) => stylesheet,
                Err(err) => {
                    tracing::warn!(%err, "ignoring unparsable injected stylesheet");
                    continue;
                }
            };
            for selector in stylesheet.selectors() {
                match SelectorList::parse(selector) {
                    Ok(list) => rules.push((selector.to_string(), list)),
                    Err(err) => tracing::trace!(selector, %err, "unsupported rule selector"),
                }
            }
        }
        tracing::debug!(rules = rules.len(), "provenance index built");
        Self { rules }
    }

    /// First rule selector matching `node`
    pub fn filter_for(&self, tree: &DomTree, node: NodeId) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, list)| matches_selector(tree, node, list))
            .map(|(selector, _)| selector.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
