//! Error types for seedbook-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in seedbook-core
///
/// Out-of-range coordinates and shape limits are never errors; those
/// operations degrade to no-ops. These variants cover validation answers and
/// construction from caller-supplied rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Sheet title empty or too long after trimming
    #[error("Invalid sheet title: {0:?}")]
    InvalidTitle(String),

    /// Customer name empty or too long after trimming
    #[error("Invalid customer name: {0:?}")]
    InvalidCustomerName(String),

    /// Phone number with a wrong digit count or stray characters
    #[error("Invalid phone number: {0:?}")]
    InvalidPhone(String),

    /// Free text over its length limit
    #[error("{field} is too long ({len} characters, max: {max})")]
    TextTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A row whose width differs from the first row
    #[error("Row {row} has {actual} cells, expected {expected}")]
    JaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Shape outside 1..=MAX_ROWS by 1..=MAX_COLS
    #[error("Sheet shape {rows}x{columns} is outside the allowed limits")]
    ShapeOutOfLimits { rows: usize, columns: usize },
}
