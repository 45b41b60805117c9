//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellData`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod value;

pub use address::CellAddress;
pub use value::CellData;
