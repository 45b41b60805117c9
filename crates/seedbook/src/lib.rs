//! # seedbook
//!
//! Customer sheets for a seeds-and-plants admin panel.
//!
//! Each customer owns a handful of small spreadsheet-like grids ("sheets")
//! used to track orders, payments and notes. This crate ties the pieces
//! together:
//!
//! - [`seedbook_core`] - the immutable grid and customer model
//! - [`seedbook_record`] - the flat document form written to storage
//! - [`seedbook_store`] - the document store and typed repositories
//! - [`seedbook_export`] - text and CSV renderers for sharing a sheet
//! - [`SheetsState`] / [`CustomersState`] - the state containers a UI drives
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use seedbook::prelude::*;
//!
//! # async fn example() -> seedbook::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let customers = CustomersState::new(Arc::clone(&store));
//! let ana = customers.create("Ana Lima", "+55 11 98765-4321", "").await?;
//!
//! let sheets = SheetsState::new(store);
//! sheets.load(ana.id().unwrap()).await?;
//! sheets.create_sheet("Seed orders", SheetShape::default()).await?;
//! sheets.edit(SheetEdit::SetCell { row: 0, col: 0, value: "Basil".into() });
//! sheets.save_now().await?;
//!
//! let sheet = sheets.current().unwrap();
//! let text = TextRenderer::default().render(&sheet, &ana)?;
//! assert!(String::from_utf8_lossy(&text).contains("Basil"));
//! # Ok(())
//! # }
//! ```

pub mod autosave;
pub mod customers;
pub mod error;
mod loading;
pub mod prelude;
pub mod state;

pub use autosave::{Autosave, AutosaveOptions, SaveStatus, DEFAULT_AUTOSAVE_DELAY};
pub use customers::{CustomersState, CustomersView};
pub use error::{user_message, Error, Result};
pub use state::{SheetsState, SheetsView};

// Re-export core types
pub use seedbook_core::{
    CellAddress, CellData, Customer, CustomerSheet, SheetEdit, SheetShape, TimestampInput,
    DEFAULT_COLS, DEFAULT_ROWS, MAX_COLS, MAX_NAME_LEN, MAX_NOTES_LEN, MAX_ROWS, MAX_TITLE_LEN,
};

// Re-export record codec
pub use seedbook_record::{
    decode_customer, decode_sheet, encode_customer, encode_sheet, CustomerRecord, RecordError,
    SheetRecord,
};

// Re-export storage
pub use seedbook_store::{
    CustomerRepository, CustomerStream, Document, DocumentStore, MemoryStore, Query,
    SheetRepository, SheetStream, StoreError, StoreResult, CUSTOMERS_COLLECTION,
    SHEETS_COLLECTION,
};

// Re-export export renderers
pub use seedbook_export::{
    export_to_file, suggested_file_name, CsvExportOptions, CsvRenderer, ExportError,
    ExportOptions, SheetRenderer, TextRenderer,
};
