//! Error types for canvas operations.

use crate::shapes::ShapeId;
use thiserror::Error;

/// Errors produced by canvas state transitions.
///
/// Exhausted undo/redo stacks and unbalanced transaction ends are not errors;
/// see [`HistoryStep`](crate::history::HistoryStep) and
/// [`TransactionEnd`](crate::history::TransactionEnd).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// An object with this identifier is already on the canvas. The caller
    /// must regenerate an identifier and retry.
    #[error("Duplicate shape identifier: {0}")]
    DuplicateIdentifier(ShapeId),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::Serialization(err.to_string())
    }
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;
