//! # seedbook-core
//!
//! Core data structures for the seedbook admin panel.
//!
//! This crate provides the value types every other seedbook crate works with:
//! - [`CellData`] - A single grid cell (raw text plus a derived numeric flag)
//! - [`CellAddress`] - A cell's location, with A1-style parsing for user input
//! - [`CustomerSheet`] - An immutable, always-rectangular grid of cells owned by a customer
//! - [`SheetEdit`] - A discrete edit intent forwarded by the presentation layer
//! - [`Customer`] - The owner of sheets
//!
//! ## Example
//!
//! ```rust
//! use seedbook_core::{CellData, CustomerSheet};
//!
//! let sheet = CustomerSheet::new("customer-1", "Tomato seedlings");
//! let sheet = sheet.set_cell(0, 0, CellData::from_value("Roma"));
//! let sheet = sheet.set_cell(0, 1, CellData::from_value("12.50"));
//!
//! assert_eq!(sheet.non_empty_cell_count(), 2);
//! assert_eq!(sheet.cell(0, 1).unwrap().display_value(), "12.5");
//! assert!(sheet.cell(10, 0).is_none());
//! ```

pub mod cell;
pub mod customer;
pub mod edit;
pub mod error;
pub mod sheet;
pub mod timestamp;

// Re-exports for convenience
pub use cell::{CellAddress, CellData};
pub use customer::Customer;
pub use edit::SheetEdit;
pub use error::{Error, Result};
pub use sheet::{CustomerSheet, SheetShape};
pub use timestamp::TimestampInput;

/// Maximum number of rows in a sheet
pub const MAX_ROWS: usize = 100;

/// Maximum number of columns in a sheet
pub const MAX_COLS: usize = 20;

/// Rows in a freshly created sheet
pub const DEFAULT_ROWS: usize = 10;

/// Columns in a freshly created sheet
pub const DEFAULT_COLS: usize = 5;

/// Maximum length of a sheet title (in characters, after trimming)
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum length of a customer name (in characters, after trimming)
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of customer notes (in characters)
pub const MAX_NOTES_LEN: usize = 1000;
