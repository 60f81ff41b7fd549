//! DOM Node Operations
//!
//! Error type shared by appendChild, insertBefore, removeChild and destroy.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Handle does not resolve to a live node
    #[error("node {0:?} not found")]
    NotFound(NodeId),
    /// Inserting a node into itself or one of its descendants
    #[error("hierarchy request error: {child:?} cannot be inserted under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Reference node is not a child of the given parent
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// The document node cannot be moved or destroyed
    #[error("the document node cannot be detached")]
    DocumentNode,
}
