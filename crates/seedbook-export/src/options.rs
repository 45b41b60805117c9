//! Export options

/// Options for the paginated text document
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Grid rows per page (at least 1)
    pub rows_per_page: usize,
    /// Print column letters above the grid
    pub column_letters: bool,
    /// Print 1-based row numbers left of the grid
    pub row_numbers: bool,
    /// Leave out rows with no content
    pub skip_empty_rows: bool,
    /// Longer cell text is cut and ends with `~`
    pub max_column_width: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            rows_per_page: 40,
            column_letters: true,
            row_numbers: true,
            skip_empty_rows: true,
            max_column_width: 24,
        }
    }
}

/// Options for CSV export
#[derive(Debug, Clone)]
pub struct CsvExportOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Write a row of column letters first
    pub write_header: bool,
    /// Write display values ("12.5") instead of raw input ("12.50")
    pub display_values: bool,
    /// Line terminator
    pub line_terminator: LineTerminator,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            write_header: false,
            display_values: false,
            line_terminator: LineTerminator::CRLF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}
