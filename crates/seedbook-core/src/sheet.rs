//! Customer sheet type
//!
//! A [`CustomerSheet`] is an immutable snapshot of a small grid. Every edit
//! returns a new snapshot and leaves the receiver untouched, so callers can
//! hold on to older snapshots freely. Edits that would break the shape rules
//! (out-of-range coordinates, growing past the limits, shrinking below one
//! row or column) return an unchanged copy instead of failing.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cell::{CellAddress, CellData};
use crate::error::{Error, Result};
use crate::timestamp::now_millis;
use crate::{DEFAULT_COLS, DEFAULT_ROWS, MAX_COLS, MAX_ROWS, MAX_TITLE_LEN};

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetShape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
}

impl SheetShape {
    /// Create a shape
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Clamp into `1..=MAX_ROWS` by `1..=MAX_COLS`
    pub fn clamped(self) -> Self {
        Self {
            rows: self.rows.clamp(1, MAX_ROWS),
            columns: self.columns.clamp(1, MAX_COLS),
        }
    }

    /// Whether the shape is within the sheet limits
    pub fn is_within_limits(&self) -> bool {
        (1..=MAX_ROWS).contains(&self.rows) && (1..=MAX_COLS).contains(&self.columns)
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }
}

impl Default for SheetShape {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLS,
        }
    }
}

impl fmt::Display for SheetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows × {} columns", self.rows, self.columns)
    }
}

/// A sheet (grid of cells) belonging to a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSheet {
    /// Store-assigned identity; `None` until persisted
    id: Option<String>,
    /// Owning customer
    customer_id: String,
    /// Trimmed title
    title: String,
    /// Dense rows, each exactly `column_count` wide
    cells: Arc<Vec<Vec<CellData>>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerSheet {
    /// Create an empty 10×5 sheet
    pub fn new<C: Into<String>, T: AsRef<str>>(customer_id: C, title: T) -> Self {
        Self::with_shape(customer_id, title, SheetShape::default())
    }

    /// Create an empty sheet with the given shape (clamped to the sheet limits)
    pub fn with_shape<C: Into<String>, T: AsRef<str>>(
        customer_id: C,
        title: T,
        shape: SheetShape,
    ) -> Self {
        let shape = shape.clamped();
        let now = now_millis();
        Self {
            id: None,
            customer_id: customer_id.into(),
            title: title.as_ref().trim().to_string(),
            cells: Arc::new(vec![vec![CellData::empty(); shape.columns]; shape.rows]),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a sheet from existing rows
    ///
    /// This is the only way to hand rows to a sheet, so it is where the
    /// rectangular shape is checked: every row must be as wide as the first,
    /// and the shape must be within the sheet limits.
    pub fn from_rows<C: Into<String>, T: AsRef<str>>(
        id: Option<String>,
        customer_id: C,
        title: T,
        rows: Vec<Vec<CellData>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        let shape = SheetShape::new(rows.len(), columns);
        if !shape.is_within_limits() {
            return Err(Error::ShapeOutOfLimits {
                rows: shape.rows,
                columns: shape.columns,
            });
        }

        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
            return Err(Error::JaggedRow {
                row,
                expected: columns,
                actual: cells.len(),
            });
        }

        Ok(Self {
            id,
            customer_id: customer_id.into(),
            title: title.as_ref().trim().to_string(),
            cells: Arc::new(rows),
            created_at,
            updated_at: updated_at.max(created_at),
        })
    }

    /// Attach the identity the store assigned
    pub fn with_id<S: Into<String>>(&self, id: S) -> Self {
        Self {
            id: Some(id.into()),
            ..self.clone()
        }
    }

    // === Metadata ===

    /// Store-assigned identity, if persisted
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Owning customer's identity
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Sheet title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last content, shape or title change
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    /// Grid dimensions
    pub fn shape(&self) -> SheetShape {
        SheetShape::new(self.row_count(), self.column_count())
    }

    /// Whether two snapshots share the same cell storage
    ///
    /// No-op edits and metadata-only copies share storage with their input.
    pub fn shares_cells_with(&self, other: &CustomerSheet) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    // === Cell Access ===

    /// Get a cell by row and column indices
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellData> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by address
    pub fn cell_at(&self, address: &CellAddress) -> Option<&CellData> {
        self.cell(address.row, address.col)
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[CellData]> + '_ {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Iterate over every cell with its address, row by row
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &CellData)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (CellAddress::new(row, col), cell))
        })
    }

    /// Header label for a column (A, B, ..., T)
    pub fn column_label(col: usize) -> String {
        CellAddress::column_to_letters(col)
    }

    // === Mutation ===

    /// Replace one cell
    pub fn set_cell(&self, row: usize, col: usize, cell: CellData) -> Self {
        if row >= self.row_count() || col >= self.column_count() {
            return self.clone();
        }

        let mut cells = self.cells.as_ref().clone();
        cells[row][col] = cell;
        self.with_cells(cells)
    }

    /// Replace one cell with an empty one
    pub fn clear_cell(&self, row: usize, col: usize) -> Self {
        self.set_cell(row, col, CellData::empty())
    }

    /// Append a row of empty cells
    pub fn add_row(&self) -> Self {
        if self.row_count() >= MAX_ROWS {
            return self.clone();
        }

        let mut cells = self.cells.as_ref().clone();
        cells.push(vec![CellData::empty(); self.column_count()]);
        self.with_cells(cells)
    }

    /// Append an empty cell to every row
    pub fn add_column(&self) -> Self {
        if self.column_count() >= MAX_COLS {
            return self.clone();
        }

        let mut cells = self.cells.as_ref().clone();
        for row in &mut cells {
            row.push(CellData::empty());
        }
        self.with_cells(cells)
    }

    /// Remove the row at `index`
    pub fn remove_row(&self, index: usize) -> Self {
        if index >= self.row_count() || self.row_count() <= 1 {
            return self.clone();
        }

        let mut cells = self.cells.as_ref().clone();
        cells.remove(index);
        self.with_cells(cells)
    }

    /// Remove the column at `index` from every row
    pub fn remove_column(&self, index: usize) -> Self {
        if index >= self.column_count() || self.column_count() <= 1 {
            return self.clone();
        }

        let mut cells = self.cells.as_ref().clone();
        for row in &mut cells {
            row.remove(index);
        }
        self.with_cells(cells)
    }

    /// Change the title
    ///
    /// The title is trimmed; a title that is empty or over the length limit
    /// after trimming leaves the sheet unchanged. Callers that need to tell
    /// the user why should check [`CustomerSheet::is_valid_title`] first.
    pub fn rename<T: AsRef<str>>(&self, title: T) -> Self {
        if !Self::is_valid_title(title.as_ref()) {
            return self.clone();
        }

        Self {
            title: title.as_ref().trim().to_string(),
            updated_at: self.mutation_time(),
            ..self.clone()
        }
    }

    fn with_cells(&self, cells: Vec<Vec<CellData>>) -> Self {
        Self {
            id: self.id.clone(),
            customer_id: self.customer_id.clone(),
            title: self.title.clone(),
            cells: Arc::new(cells),
            created_at: self.created_at,
            updated_at: self.mutation_time(),
        }
    }

    fn mutation_time(&self) -> DateTime<Utc> {
        now_millis().max(self.created_at)
    }

    // === Validation ===

    /// Whether `title` is acceptable: 1 to 100 characters after trimming
    pub fn is_valid_title(title: &str) -> bool {
        let len = title.trim().chars().count();
        (1..=MAX_TITLE_LEN).contains(&len)
    }

    /// Check the sheet's own title
    pub fn validate(&self) -> Result<()> {
        if Self::is_valid_title(&self.title) {
            Ok(())
        } else {
            Err(Error::InvalidTitle(self.title.clone()))
        }
    }

    // === Queries ===

    /// Whether every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(CellData::is_empty)
    }

    /// Whether at least one cell has content
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Number of cells with content
    pub fn non_empty_cell_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.is_empty()).count()
    }

    /// Number of numeric cells
    pub fn numeric_cell_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_numeric()).count()
    }

    /// Case-insensitive match against the title or any cell's raw value
    ///
    /// An empty term matches every sheet.
    pub fn contains_search_term(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }

        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .cells
                .iter()
                .flatten()
                .any(|c| c.contains_ignore_case(&needle))
    }

    /// Addresses of the cells whose raw value contains `term` (case-insensitive)
    pub fn find_cells(&self, term: &str) -> Vec<CellAddress> {
        if term.is_empty() {
            return Vec::new();
        }

        let needle = term.to_lowercase();
        self.cells()
            .filter(|(_, cell)| cell.contains_ignore_case(&needle))
            .map(|(addr, _)| addr)
            .collect()
    }

    /// Sum of the numeric cells in a column, or `None` if out of range
    pub fn column_sum(&self, col: usize) -> Option<f64> {
        if col >= self.column_count() {
            return None;
        }
        Some(self.cells.iter().filter_map(|r| r[col].as_number()).sum())
    }

    /// Sum of the numeric cells in a row, or `None` if out of range
    pub fn row_sum(&self, row: usize) -> Option<f64> {
        self.cells
            .get(row)
            .map(|r| r.iter().filter_map(CellData::as_number).sum())
    }

    /// Cells of one column, top to bottom
    pub fn column_values(&self, col: usize) -> Option<Vec<&CellData>> {
        if col >= self.column_count() {
            return None;
        }
        Some(self.cells.iter().map(|r| &r[col]).collect())
    }

    /// Shape and fill summary, e.g. "10 rows × 5 columns (12 filled)"
    pub fn summary(&self) -> String {
        format!("{} ({} filled)", self.shape(), self.non_empty_cell_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::SheetEdit;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sheet(rows: usize, columns: usize) -> CustomerSheet {
        CustomerSheet::with_shape("cust-1", "Seed orders", SheetShape::new(rows, columns))
    }

    fn assert_rectangular(sheet: &CustomerSheet) {
        let columns = sheet.column_count();
        assert!(columns >= 1);
        assert!(sheet.row_count() >= 1);
        for row in sheet.rows() {
            assert_eq!(row.len(), columns);
        }
    }

    #[test]
    fn test_column_label() {
        assert_eq!(CustomerSheet::column_label(0), "A");
        assert_eq!(CustomerSheet::column_label(19), "T");
        assert!(!CustomerSheet::column_label(usize::MAX).is_empty());
    }

    #[test]
    fn test_new_sheet_defaults() {
        let s = CustomerSheet::new("cust-1", "  Spring order  ");
        assert_eq!(s.shape(), SheetShape::new(10, 5));
        assert_eq!(s.title(), "Spring order");
        assert_eq!(s.customer_id(), "cust-1");
        assert_eq!(s.id(), None);
        assert_eq!(s.created_at(), s.updated_at());
        assert!(s.is_empty());
        assert_eq!(s.non_empty_cell_count(), 0);
    }

    #[test]
    fn test_with_shape_clamps() {
        assert_eq!(sheet(0, 0).shape(), SheetShape::new(1, 1));
        assert_eq!(sheet(500, 50).shape(), SheetShape::new(MAX_ROWS, MAX_COLS));
    }

    #[test]
    fn test_set_cell_in_range() {
        let s = sheet(10, 5);
        let edited = s.set_cell(2, 3, CellData::from_value("Basil"));

        assert_eq!(edited.cell(2, 3).unwrap().value(), "Basil");
        assert_eq!(edited.non_empty_cell_count(), 1);
        assert!(edited.updated_at() >= s.updated_at());
        // Input unchanged
        assert!(s.cell(2, 3).unwrap().is_empty());
        assert_eq!(s.non_empty_cell_count(), 0);
    }

    #[test]
    fn test_set_cell_out_of_range_is_noop() {
        let s = sheet(10, 5);
        for (row, col) in [(usize::MAX, 0), (0, 9999), (10, 0), (0, 5)] {
            let edited = s.set_cell(row, col, CellData::from_value("x"));
            assert_eq!(edited, s);
            assert!(edited.shares_cells_with(&s));
        }
    }

    #[test]
    fn test_cell_out_of_range_is_absent() {
        let s = sheet(3, 3);
        assert!(s.cell(0, 0).is_some());
        assert!(s.cell(3, 0).is_none());
        assert!(s.cell(0, 3).is_none());
        assert!(s.cell(usize::MAX, usize::MAX).is_none());
    }

    #[test]
    fn test_add_row_and_column() {
        let s = sheet(2, 2).add_row().add_column();
        assert_eq!(s.shape(), SheetShape::new(3, 3));
        assert_rectangular(&s);
    }

    #[test]
    fn test_add_row_at_limit_is_noop() {
        let s = sheet(MAX_ROWS, 5);
        let grown = s.add_row();
        assert_eq!(grown.row_count(), MAX_ROWS);
        assert_eq!(grown, s);
        assert!(grown.shares_cells_with(&s));
    }

    #[test]
    fn test_add_column_at_limit_is_noop() {
        let s = sheet(5, MAX_COLS);
        let grown = s.add_column();
        assert_eq!(grown.column_count(), MAX_COLS);
        assert_eq!(grown, s);
    }

    #[test]
    fn test_remove_row_and_column() {
        let s = sheet(3, 3)
            .set_cell(0, 0, "a".into())
            .set_cell(1, 1, "b".into())
            .set_cell(2, 2, "c".into());

        let s = s.remove_row(1);
        assert_eq!(s.shape(), SheetShape::new(2, 3));
        assert_eq!(s.cell(0, 0).unwrap().value(), "a");
        assert_eq!(s.cell(1, 2).unwrap().value(), "c");

        let s = s.remove_column(0);
        assert_eq!(s.shape(), SheetShape::new(2, 2));
        assert!(s.cell(0, 0).unwrap().is_empty());
        assert_eq!(s.cell(1, 1).unwrap().value(), "c");
    }

    #[test]
    fn test_remove_invalid_index_is_noop() {
        let s = sheet(3, 3);
        assert_eq!(s.remove_row(3), s);
        assert_eq!(s.remove_column(99), s);
    }

    #[test]
    fn test_remove_column_on_single_column_is_noop() {
        let s = sheet(4, 1);
        let shrunk = s.remove_column(0);
        assert_eq!(shrunk.column_count(), 1);
        assert_eq!(shrunk, s);
    }

    #[test]
    fn test_one_by_one_floor_holds() {
        let s = sheet(1, 1);
        let shrunk = s.remove_row(0).remove_column(0).remove_row(0).remove_column(0);
        assert_eq!(shrunk.shape(), SheetShape::new(1, 1));
    }

    #[test]
    fn test_rename() {
        let s = sheet(2, 2);
        let renamed = s.rename("  Bulbs  ");
        assert_eq!(renamed.title(), "Bulbs");
        assert_eq!(s.title(), "Seed orders");

        assert_eq!(s.rename("   "), s);
        assert_eq!(s.rename("x".repeat(101)), s);
        assert_eq!(s.rename("x".repeat(100)).title().len(), 100);
    }

    #[test]
    fn test_is_valid_title() {
        assert!(CustomerSheet::is_valid_title("a"));
        assert!(CustomerSheet::is_valid_title(" Orders "));
        assert!(!CustomerSheet::is_valid_title(""));
        assert!(!CustomerSheet::is_valid_title("   "));
        // Counted in characters, not bytes
        assert!(CustomerSheet::is_valid_title(&"é".repeat(100)));
        assert!(!CustomerSheet::is_valid_title(&"é".repeat(101)));
    }

    #[test]
    fn test_validate() {
        assert!(sheet(1, 1).validate().is_ok());
        assert_eq!(
            CustomerSheet::new("c", " ").validate(),
            Err(Error::InvalidTitle(String::new()))
        );
    }

    #[test]
    fn test_non_empty_count_after_one_edit() {
        let s = CustomerSheet::new("cust-1", "Orders");
        assert_eq!(s.non_empty_cell_count(), 0);
        let s = s.set_cell(4, 4, CellData::from_value("Sunflower"));
        assert_eq!(s.non_empty_cell_count(), 1);
        assert!(s.is_not_empty());
    }

    #[test]
    fn test_contains_search_term() {
        let s = sheet(3, 3).set_cell(1, 1, "Lavender Seeds".into());

        assert!(s.contains_search_term(""));
        assert!(s.contains_search_term("lavender"));
        assert!(s.contains_search_term("SEED")); // Title and cell
        assert!(s.contains_search_term("orders"));
        assert!(!s.contains_search_term("xyz"));
        assert!(sheet(1, 1).contains_search_term(""));
    }

    #[test]
    fn test_find_cells() {
        let s = sheet(3, 3)
            .set_cell(0, 1, "Tomato".into())
            .set_cell(2, 0, "cherry tomato".into());

        assert_eq!(
            s.find_cells("TOMATO"),
            vec![CellAddress::new(0, 1), CellAddress::new(2, 0)]
        );
        assert!(s.find_cells("").is_empty());
    }

    #[test]
    fn test_sums() {
        let s = sheet(3, 2)
            .set_cell(0, 1, "12.5".into())
            .set_cell(1, 1, "7".into())
            .set_cell(2, 1, "n/a".into())
            .set_cell(0, 0, "3".into());

        assert_eq!(s.column_sum(1), Some(19.5));
        assert_eq!(s.column_sum(0), Some(3.0));
        assert_eq!(s.column_sum(2), None);
        assert_eq!(s.row_sum(0), Some(15.5));
        assert_eq!(s.row_sum(3), None);
        assert_eq!(s.numeric_cell_count(), 3);
        assert_eq!(s.column_values(1).unwrap().len(), 3);
    }

    #[test]
    fn test_summary() {
        let s = CustomerSheet::new("cust-1", "Orders")
            .set_cell(0, 0, "a".into())
            .set_cell(0, 1, "b".into());
        assert_eq!(s.summary(), "10 rows × 5 columns (2 filled)");
    }

    #[test]
    fn test_from_rows_rejects_jagged() {
        let now = now_millis();
        let rows = vec![
            vec![CellData::empty(), CellData::empty()],
            vec![CellData::empty()],
        ];
        assert_eq!(
            CustomerSheet::from_rows(None, "c", "t", rows, now, now),
            Err(Error::JaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let now = now_millis();
        assert!(CustomerSheet::from_rows(None, "c", "t", Vec::new(), now, now).is_err());
        assert!(CustomerSheet::from_rows(None, "c", "t", vec![Vec::new()], now, now).is_err());
        let wide = vec![vec![CellData::empty(); MAX_COLS + 1]];
        assert!(CustomerSheet::from_rows(None, "c", "t", wide, now, now).is_err());
    }

    #[test]
    fn test_from_rows_keeps_updated_after_created() {
        let created = DateTime::from_timestamp_millis(2_000).unwrap();
        let updated = DateTime::from_timestamp_millis(1_000).unwrap();
        let s = CustomerSheet::from_rows(
            Some("s1".into()),
            "c",
            "t",
            vec![vec![CellData::empty()]],
            created,
            updated,
        )
        .unwrap();
        assert_eq!(s.updated_at(), created);
        assert_eq!(s.id(), Some("s1"));
    }

    #[test]
    fn test_with_id_keeps_content() {
        let s = sheet(2, 2).set_cell(0, 0, "x".into());
        let persisted = s.with_id("abc");
        assert_eq!(persisted.id(), Some("abc"));
        assert!(persisted.shares_cells_with(&s));
        assert_eq!(persisted.updated_at(), s.updated_at());
    }

    fn edit_strategy() -> impl Strategy<Value = SheetEdit> {
        prop_oneof![
            (0usize..120, 0usize..25, "[a-z0-9.]{0,4}")
                .prop_map(|(row, col, value)| SheetEdit::SetCell { row, col, value }),
            Just(SheetEdit::AddRow),
            Just(SheetEdit::AddColumn),
            (0usize..120).prop_map(SheetEdit::RemoveRow),
            (0usize..25).prop_map(SheetEdit::RemoveColumn),
        ]
    }

    proptest! {
        #[test]
        fn prop_edits_keep_sheet_rectangular(
            rows in 1usize..=MAX_ROWS,
            columns in 1usize..=MAX_COLS,
            edits in proptest::collection::vec(edit_strategy(), 0..60),
        ) {
            let mut s = sheet(rows, columns);
            for edit in &edits {
                let next = edit.apply(&s);
                prop_assert!(next.shape().is_within_limits());
                prop_assert!(next.updated_at() >= next.created_at());
                s = next;
            }
            let width = s.column_count();
            prop_assert!(s.rows().all(|r| r.len() == width));
        }
    }
}
