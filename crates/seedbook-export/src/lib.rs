//! # seedbook-export
//!
//! Turns a sheet and its customer into a shareable document.
//!
//! Renderers only use the public query API of
//! [`CustomerSheet`](seedbook_core::CustomerSheet), never its internals.

mod delimited;
mod error;
mod options;
mod renderer;
mod text;

pub use delimited::CsvRenderer;
pub use error::{ExportError, ExportResult};
pub use options::{CsvExportOptions, ExportOptions, LineTerminator};
pub use renderer::{export_to_file, suggested_file_name, SheetRenderer};
pub use text::TextRenderer;
