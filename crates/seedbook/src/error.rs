//! Top-level error type and user-facing messages.

use seedbook_export::ExportError;
use seedbook_record::RecordError;
use seedbook_store::StoreError;
use thiserror::Error;

/// Any failure a seedbook operation can report
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] seedbook_core::Error),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Phrase a store failure for display in the UI
pub fn user_message(err: &StoreError) -> String {
    match err {
        StoreError::Unavailable(_) | StoreError::SubscriptionClosed => {
            "Can't reach the server. Check your connection and try again.".to_string()
        }
        StoreError::NotFound { .. } => "This item no longer exists.".to_string(),
        StoreError::Rejected(reason) => format!("The server rejected the change: {reason}"),
        StoreError::MissingId => "Save the item before editing it.".to_string(),
        StoreError::Record(_) => "Stored data could not be read.".to_string(),
        StoreError::Validation(e) => e.to_string(),
    }
}
