//! Error types for store access.

use thiserror::Error;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Record has no id; it must be created before it can be updated")]
    MissingId,

    #[error("Subscription closed")]
    SubscriptionClosed,

    #[error("Record error: {0}")]
    Record(#[from] seedbook_record::RecordError),

    #[error("Invalid data: {0}")]
    Validation(#[from] seedbook_core::Error),
}

impl StoreError {
    /// Whether retrying the same call later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::SubscriptionClosed
        )
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
