//! fOS Inspector - live DOM inspection core
//!
//! Keeps an identity-stable picture of a mutating document for a remote
//! controller:
//!
//! - [`IdentityRegistry`] hands out opaque node identifiers per epoch
//! - [`SnapshotBuilder`] flattens the tree into [`LayoutNode`]s
//! - [`MutationJournal`] turns debounced change records into add/remove entries
//! - [`SelectorSynthesizer`] derives coarse and filter-grade selectors
//! - [`InspectorSession`] routes protocol [`Request`]s to all of the above
//!
//! ```
//! use std::time::Instant;
//! use fos_inspector::{InspectorConfig, InspectorSession, NullOverlay, Request, Response};
//!
//! let mut doc = fos_html::parse(r#"<div id="x"><span class="a b"></span></div>"#);
//! let mut session = InspectorSession::new(InspectorConfig::with_session("s"), Box::new(NullOverlay));
//!
//! let request = Request::DomLayout { fingerprint: None };
//! let Some(Response::DomLayout(layout)) = session.handle(&mut doc, request, Instant::now()).unwrap() else {
//!     panic!("domLayout always answers");
//! };
//! let sels: Vec<_> = layout.layout.unwrap().into_iter().map(|n| n.sel).collect();
//! assert_eq!(sels, ["body", "div#x", "span.a.b"]);
//! ```

mod config;
mod debounce;
mod error;
mod journal;
mod overlay;
mod protocol;
mod provenance;
mod registry;
mod session;
mod snapshot;
mod synthesizer;
mod toggle;

pub use config::InspectorConfig;
pub use debounce::DebounceTimer;
pub use error::{InspectorError, InspectorResult};
pub use journal::{JournalBatch, JournalEntry, MutationJournal};
pub use overlay::{HighlightLists, NullOverlay, Overlay};
pub use protocol::{
    DomLayoutResponse, ErrorResponse, FilterEntry, LayoutStatus, Request, Response,
};
pub use provenance::ProvenanceIndex;
pub use registry::{IdentityRegistry, Nid};
pub use session::InspectorSession;
pub use snapshot::{LayoutNode, SnapshotBuilder, compute_counts};
pub use synthesizer::{SelectorSynthesizer, elements_from_selector};
pub use toggle::{SavedDisplay, ToggleRecords};
