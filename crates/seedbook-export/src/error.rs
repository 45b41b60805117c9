//! Export error types

use thiserror::Error;

/// Result type for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Formatting error while laying out text
    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Sheet handed over with somebody else's customer record
    #[error("Sheet belongs to customer {sheet_owner}, not {customer_id}")]
    OwnerMismatch {
        sheet_owner: String,
        customer_id: String,
    },
}
