//! Discrete edit intents
//!
//! The grid view never touches a sheet directly. It reports what the user
//! did as a [`SheetEdit`], and whoever owns the current snapshot applies it.

use crate::cell::CellData;
use crate::sheet::CustomerSheet;

/// One user edit on a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetEdit {
    /// Type text into a cell
    SetCell {
        row: usize,
        col: usize,
        value: String,
    },
    /// Clear a cell
    ClearCell { row: usize, col: usize },
    /// Append a row at the bottom
    AddRow,
    /// Append a column at the right
    AddColumn,
    /// Delete a row
    RemoveRow(usize),
    /// Delete a column
    RemoveColumn(usize),
    /// Change the title
    Rename(String),
}

impl SheetEdit {
    /// Compute the next snapshot; `sheet` itself is left unchanged
    pub fn apply(&self, sheet: &CustomerSheet) -> CustomerSheet {
        match self {
            SheetEdit::SetCell { row, col, value } => {
                sheet.set_cell(*row, *col, CellData::from_value(value.as_str()))
            }
            SheetEdit::ClearCell { row, col } => sheet.clear_cell(*row, *col),
            SheetEdit::AddRow => sheet.add_row(),
            SheetEdit::AddColumn => sheet.add_column(),
            SheetEdit::RemoveRow(index) => sheet.remove_row(*index),
            SheetEdit::RemoveColumn(index) => sheet.remove_column(*index),
            SheetEdit::Rename(title) => sheet.rename(title),
        }
    }

    /// Whether this edit can change the grid shape
    pub fn changes_shape(&self) -> bool {
        matches!(
            self,
            SheetEdit::AddRow
                | SheetEdit::AddColumn
                | SheetEdit::RemoveRow(_)
                | SheetEdit::RemoveColumn(_)
        )
    }
}
