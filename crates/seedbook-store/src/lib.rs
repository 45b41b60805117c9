//! Document store access for seedbook.
//!
//! The admin panel keeps its data in a hosted document database. This crate
//! defines the small slice of that database the app relies on
//! ([`DocumentStore`]), an in-process implementation ([`MemoryStore`]) and
//! typed repositories that run documents through the `seedbook-record` codec.
//!
//! # Architecture
//!
//! ```text
//! State layer (seedbook crate)
//!     └── SheetRepository / CustomerRepository (this crate)
//!           └── seedbook-record (flatten / unflatten)
//!           └── DocumentStore (MemoryStore, or a hosted backend)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use seedbook_core::CustomerSheet;
//! use seedbook_store::{MemoryStore, SheetRepository};
//!
//! # async fn example() -> seedbook_store::StoreResult<()> {
//! let sheets = SheetRepository::new(Arc::new(MemoryStore::new()));
//!
//! let sheet = sheets.create(&CustomerSheet::new("cust-1", "Seed orders")).await?;
//! let loaded = sheets.get(sheet.id().unwrap()).await?;
//! assert_eq!(loaded, Some(sheet));
//! # Ok(())
//! # }
//! ```

pub mod customers;
pub mod document;
pub mod error;
pub mod memory;
pub mod sheets;
pub mod store;
pub mod stream;

pub use customers::CustomerRepository;
pub use document::{Document, OrderBy, Query};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sheets::SheetRepository;
pub use store::{DocumentStore, Subscription};
pub use stream::{CustomerStream, RecordStream, SheetStream};

/// Collection holding sheet documents
pub const SHEETS_COLLECTION: &str = "customer_sheets";

/// Collection holding customer documents
pub const CUSTOMERS_COLLECTION: &str = "customers";
