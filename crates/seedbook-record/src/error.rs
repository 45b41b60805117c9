//! Record error types

use thiserror::Error;

/// Result type for record operations
pub type RecordResult<T> = std::result::Result<T, RecordError>;

/// Errors that can occur while encoding or decoding records
///
/// Damaged field contents never fail a decode; only a document that is not
/// an object at all does.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Document body is not a JSON object
    #[error("Document is not an object (found {0})")]
    NotAnObject(&'static str),

    /// JSON library error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] seedbook_core::Error),
}
