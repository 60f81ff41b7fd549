//! Inspector session
//!
//! Owns every piece of per-session state (registry, journal, provenance,
//! toggle records, highlights) and routes protocol requests to them. A
//! session inspects one [`Document`] at a time and is driven by the host:
//! requests through [`InspectorSession::handle`], the debounce timer
//! through [`InspectorSession::poll`].

use std::time::Instant;

use fos_dom::{Document, DomTree, NodeId};

use crate::config::InspectorConfig;
use crate::error::{InspectorError, InspectorResult};
use crate::journal::MutationJournal;
use crate::overlay::{HighlightLists, Overlay};
use crate::protocol::{DomLayoutResponse, FilterEntry, LayoutStatus, Request, Response};
use crate::provenance::ProvenanceIndex;
use crate::registry::{IdentityRegistry, Nid};
use crate::snapshot::{LayoutNode, SnapshotBuilder};
use crate::synthesizer::SelectorSynthesizer;
use crate::toggle::ToggleRecords;

/// One inspection session
pub struct InspectorSession {
    config: InspectorConfig,
    registry: IdentityRegistry,
    journal: MutationJournal,
    provenance: ProvenanceIndex,
    toggles: ToggleRecords,
    highlights: HighlightLists,
    overlay: Box<dyn Overlay>,
    shut_down: bool,
}

impl InspectorSession {
    pub fn new(config: InspectorConfig, overlay: Box<dyn Overlay>) -> Self {
        Self {
            registry: IdentityRegistry::new(config.session_token.clone()),
            journal: MutationJournal::new(config.debounce),
            provenance: ProvenanceIndex::default(),
            toggles: ToggleRecords::new(),
            highlights: HighlightLists::default(),
            overlay,
            shut_down: false,
            config,
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Fingerprint of the current epoch
    pub fn fingerprint(&self) -> String {
        self.registry.fingerprint()
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn highlights(&self) -> &HighlightLists {
        &self.highlights
    }

    pub fn toggles(&self) -> &ToggleRecords {
        &self.toggles
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// When the host should call [`poll`](Self::poll) next
    pub fn next_deadline(&self) -> Option<Instant> {
        self.journal.deadline()
    }

    /// Collect pending change records and coalesce them once the debounce
    /// window has elapsed. Returns whether a coalescing pass ran.
    pub fn poll(&mut self, doc: &mut Document, now: Instant) -> bool {
        if self.shut_down {
            return false;
        }
        self.journal.pump(doc.tree_mut(), now);
        if !self.journal.deadline().is_some_and(|deadline| now >= deadline) {
            return false;
        }

        let tree = doc.tree();
        let builder = SnapshotBuilder::new(tree, &self.config, &self.provenance);
        let root = SelectorSynthesizer::new(tree, &self.config).root_element();
        self.journal
            .coalesce_if_due(now, tree, &self.config, &mut self.registry, &builder, root)
    }

    /// Parse, handle and answer one JSON request.
    ///
    /// A request that does not parse is answered with an error line, so a
    /// controller waiting for a reply is never left hanging.
    pub fn handle_json(
        &mut self,
        doc: &mut Document,
        text: &str,
        now: Instant,
    ) -> InspectorResult<Option<String>> {
        let request = match Request::parse(text) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(%err, "request rejected");
                return Response::error(err).to_json().map(Some);
            }
        };
        self.handle(doc, request, now)?
            .map(|response| response.to_json())
            .transpose()
    }

    /// Handle one request
    pub fn handle(
        &mut self,
        doc: &mut Document,
        request: Request,
        now: Instant,
    ) -> InspectorResult<Option<Response>> {
        if self.shut_down {
            tracing::warn!(?request, "request after shutdown");
            return Err(InspectorError::ShutDown);
        }
        self.poll(doc, now);

        match request {
            Request::DomLayout { fingerprint } => {
                let layout = self.dom_layout(doc, fingerprint.as_deref());
                return Ok(Some(Response::DomLayout(layout)));
            }
            Request::CookFilters { entries } => {
                return Ok(Some(Response::Filters(self.cook_filters(doc.tree(), &entries))));
            }
            Request::HighlightOne { selector, nid, scroll_to } => {
                self.highlights.picked = self.select_nodes(doc.tree(), &selector, &nid);
                self.overlay.render(doc.tree(), &self.highlights, scroll_to);
            }
            Request::ShowCommitted { hide, unhide } => {
                self.toggles.reset(doc.tree_mut());
                self.highlights.picked.clear();
                self.highlights.hidden = self.select_nodes(doc.tree(), &hide, "");
                self.highlights.unhidden = self.select_nodes(doc.tree(), &unhide, "");
                self.toggles
                    .toggle(doc.tree_mut(), &self.highlights.unhidden, false, true);
                self.overlay.render(doc.tree(), &self.highlights, true);
            }
            Request::ShowInteractive { hide, unhide } => {
                self.preview(doc.tree_mut(), &hide, &unhide);
                self.highlights.clear();
                self.overlay.render(doc.tree(), &self.highlights, false);
            }
            Request::CommitFilters { hide, unhide } => {
                self.preview(doc.tree_mut(), &hide, &unhide);
                self.toggles.forget();
                self.highlights.clear();
                self.overlay.render(doc.tree(), &self.highlights, false);
            }
            Request::ToggleNodes { selector, nid, original, target } => {
                self.highlights.picked = self.select_nodes(doc.tree(), &selector, &nid);
                self.toggles
                    .toggle(doc.tree_mut(), &self.highlights.picked, original, target);
                self.overlay.render(doc.tree(), &self.highlights, true);
            }
            Request::ResetToggledNodes => self.toggles.reset(doc.tree_mut()),
            Request::HighlightMode { invert } => self.overlay.set_inverted(invert),
            Request::Shutdown => self.shutdown(doc.tree_mut()),
        }
        Ok(None)
    }

    /// Answer a layout request made with the caller's last `fingerprint`
    pub fn dom_layout(&mut self, doc: &mut Document, fingerprint: Option<&str>) -> DomLayoutResponse {
        let current = self.registry.fingerprint();
        let target = self.observation_target(doc.tree());
        let stale = fingerprint != Some(current.as_str())
            || !self.journal.observes(doc.tree(), target);

        let (status, layout, journal, nodes) = if stale {
            (LayoutStatus::Full, Some(self.rebuild(doc)), None, None)
        } else {
            match self.journal.take() {
                Some(batch) => (
                    LayoutStatus::Incremental,
                    None,
                    Some(batch.entries),
                    Some(batch.nodes),
                ),
                None => (LayoutStatus::NoChange, None, None, None),
            }
        };

        let url = doc.url().to_string();
        let hostname = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        DomLayoutResponse {
            what: "domLayout",
            fingerprint: self.registry.fingerprint(),
            url,
            hostname,
            status,
            layout,
            journal,
            nodes,
        }
    }

    /// Fine selectors for `entries`, last entry first
    pub fn cook_filters(&self, tree: &DomTree, entries: &[FilterEntry]) -> Vec<String> {
        let synth = SelectorSynthesizer::new(tree, &self.config);
        entries
            .iter()
            .rev()
            .map(|entry| {
                synth
                    .fine_selector_from(&self.registry, &entry.nid, &entry.selector)
                    .unwrap_or_else(|err| {
                        tracing::warn!(nid = %entry.nid, %err, "falling back to coarse selector");
                        entry.selector.clone()
                    })
            })
            .collect()
    }

    /// Matches of `selector`; an empty `nid` keeps them all
    pub fn select_nodes(&self, tree: &DomTree, selector: &str, nid: &str) -> Vec<NodeId> {
        let nid = (!nid.is_empty()).then(|| Nid::from(nid));
        SelectorSynthesizer::new(tree, &self.config).select_nodes(&self.registry, selector, nid.as_ref())
    }

    /// Undo the current preview and apply a new one
    fn preview(&mut self, tree: &mut DomTree, hide: &str, unhide: &str) {
        self.toggles.reset(tree);
        let hidden = self.select_nodes(tree, hide, "");
        self.toggles.toggle(tree, &hidden, true, false);
        let unhidden = self.select_nodes(tree, unhide, "");
        self.toggles.toggle(tree, &unhidden, false, true);
    }

    /// Start a new epoch: fresh identifiers, fresh subscription
    fn rebuild(&mut self, doc: &mut Document) -> Vec<LayoutNode> {
        self.journal.shutdown(doc.tree_mut());
        self.registry.reset();
        self.provenance = ProvenanceIndex::collect(doc.tree(), &self.config);

        let tree = doc.tree();
        let layout = SnapshotBuilder::new(tree, &self.config, &self.provenance)
            .build_full_snapshot(&mut self.registry);
        let target = self.observation_target(tree);
        self.journal.subscribe(doc.tree_mut(), target);

        tracing::debug!(
            fingerprint = %self.registry.fingerprint(),
            nodes = layout.len(),
            "new layout epoch"
        );
        layout
    }

    // the designated root, or the whole document when there is none
    fn observation_target(&self, tree: &DomTree) -> NodeId {
        SelectorSynthesizer::new(tree, &self.config)
            .root_element()
            .unwrap_or_else(|| tree.root())
    }

    fn shutdown(&mut self, tree: &mut DomTree) {
        self.toggles.reset(tree);
        self.journal.shutdown(tree);
        self.registry.reset();
        self.highlights.clear();
        self.overlay.teardown();
        self.shut_down = true;
        tracing::debug!("inspector session shut down");
    }
}
