//! Wire protocol
//!
//! Requests are JSON objects discriminated by `what`. Only `domLayout` and
//! `cookFilters` produce a response; the other verbs act on the page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InspectorResult;
use crate::journal::JournalEntry;
use crate::registry::Nid;
use crate::snapshot::LayoutNode;

/// A node picked by the operator, with the coarse selector it was shown with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterEntry {
    pub nid: Nid,
    pub selector: String,
}

/// Inspector request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "what", rename_all = "camelCase")]
pub enum Request {
    DomLayout {
        #[serde(default)]
        fingerprint: Option<String>,
    },
    CookFilters {
        entries: Vec<FilterEntry>,
    },
    HighlightOne {
        selector: String,
        #[serde(default)]
        nid: String,
        #[serde(rename = "scrollTo", default)]
        scroll_to: bool,
    },
    ShowCommitted {
        #[serde(default)]
        hide: String,
        #[serde(default)]
        unhide: String,
    },
    ShowInteractive {
        #[serde(default)]
        hide: String,
        #[serde(default)]
        unhide: String,
    },
    CommitFilters {
        #[serde(default)]
        hide: String,
        #[serde(default)]
        unhide: String,
    },
    ToggleNodes {
        selector: String,
        #[serde(default)]
        nid: String,
        original: bool,
        target: bool,
    },
    ResetToggledNodes,
    HighlightMode {
        invert: bool,
    },
    Shutdown,
}

impl Request {
    /// Parse one JSON request
    pub fn parse(text: &str) -> InspectorResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Kind of layout answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStatus {
    /// New epoch: `layout` holds every node
    Full,
    /// Same epoch: `journal` and `nodes` hold the changes
    Incremental,
    NoChange,
}

/// Answer to `domLayout`
#[derive(Debug, Clone, Serialize)]
pub struct DomLayoutResponse {
    pub what: &'static str,
    pub fingerprint: String,
    pub url: String,
    pub hostname: String,
    pub status: LayoutStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<LayoutNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<Vec<JournalEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<BTreeMap<Nid, LayoutNode>>,
}

/// Inspector response
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    DomLayout(DomLayoutResponse),
    /// Fine selectors, one per entry, last entry first
    Filters(Vec<String>),
    Error(ErrorResponse),
}

/// Answer to a request that could not be read
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub what: &'static str,
    pub error: String,
}

impl Response {
    pub fn error(message: impl ToString) -> Self {
        Self::Error(ErrorResponse {
            what: "error",
            error: message.to_string(),
        })
    }

    pub fn to_json(&self) -> InspectorResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
