//! Inspector errors

use fos_css::EscapeError;

/// Result type for inspector operations
pub type InspectorResult<T> = Result<T, InspectorError>;

/// Errors surfaced by the inspector session
#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    /// Message is not valid protocol JSON
    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),
    /// An identifier could not be escaped for use in a selector
    #[error("selector synthesis failed: {0}")]
    Escape(#[from] EscapeError),
    /// The session has been shut down
    #[error("inspector session is shut down")]
    ShutDown,
}
