//! Prelude module - common imports for seedbook users
//!
//! ```rust
//! use seedbook::prelude::*;
//! ```

pub use crate::{
    // Model
    CellAddress,
    CellData,
    Customer,
    CustomerSheet,
    SheetEdit,
    SheetShape,

    // State
    Autosave,
    AutosaveOptions,
    CustomersState,
    SaveStatus,
    SheetsState,

    // Storage
    DocumentStore,
    MemoryStore,
    SheetRepository,
    CustomerRepository,

    // Export
    CsvRenderer,
    ExportOptions,
    SheetRenderer,
    TextRenderer,

    // Errors
    Error,
    Result,
};
