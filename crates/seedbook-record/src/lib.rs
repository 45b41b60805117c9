//! # seedbook-record
//!
//! Conversion between seedbook's in-memory types and the flat JSON documents
//! kept in the document store.
//!
//! The store has no nested-array type, so a sheet's grid is flattened into a
//! map keyed `"cell_<row>_<col>"`. Every cell is written, empty ones included.
//! Reading is lenient: missing shape fields fall back to 10×5, stray cell keys
//! are dropped and unusable timestamps become "now", so a damaged document
//! still loads as a valid sheet.

mod customer;
mod error;
pub mod fields;
mod key;
mod sheet;

pub use customer::{decode_customer, encode_customer, CustomerRecord};
pub use error::{RecordError, RecordResult};
pub use key::CellKey;
pub use sheet::{
    decode_sheet, decode_sheet_slice, encode_sheet, encode_sheet_document, CellRecord, SheetRecord,
};
