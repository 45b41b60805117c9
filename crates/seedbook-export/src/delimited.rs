//! CSV export

use seedbook_core::{Customer, CustomerSheet};

use crate::error::{ExportError, ExportResult};
use crate::options::{CsvExportOptions, LineTerminator};
use crate::renderer::{check_owner, used_extent, SheetRenderer};

/// Writes the used part of a sheet as CSV
#[derive(Debug, Clone, Default)]
pub struct CsvRenderer {
    options: CsvExportOptions,
}

impl CsvRenderer {
    pub fn new(options: CsvExportOptions) -> Self {
        Self { options }
    }
}

impl SheetRenderer for CsvRenderer {
    fn render(&self, sheet: &CustomerSheet, customer: &Customer) -> ExportResult<Vec<u8>> {
        check_owner(sheet, customer)?;

        let terminator = match self.options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .terminator(terminator)
            .from_writer(Vec::new());

        if let Some((rows, cols)) = used_extent(sheet) {
            if self.options.write_header {
                let header: Vec<String> = (0..cols).map(CustomerSheet::column_label).collect();
                csv_writer.write_record(&header)?;
            }

            for row in sheet.rows().take(rows) {
                let record: Vec<String> = row[..cols]
                    .iter()
                    .map(|cell| {
                        if self.options.display_values {
                            cell.display_value()
                        } else {
                            cell.value().to_string()
                        }
                    })
                    .collect();
                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        csv_writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn customer() -> Customer {
        Customer::new("Ana", "12345678", "").with_id("c1")
    }

    fn sheet() -> CustomerSheet {
        CustomerSheet::new("c1", "Orders")
            .set_cell(0, 0, "Seed".into())
            .set_cell(0, 1, "Price".into())
            .set_cell(1, 0, "Basil, sweet".into())
            .set_cell(1, 1, "12.50".into())
    }

    #[test]
    fn test_used_range_only() {
        let bytes = CsvRenderer::default().render(&sheet(), &customer()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Seed,Price\r\n\"Basil, sweet\",12.50\r\n"
        );
    }

    #[test]
    fn test_header_and_display_values() {
        let renderer = CsvRenderer::new(CsvExportOptions {
            write_header: true,
            display_values: true,
            delimiter: b';',
            line_terminator: LineTerminator::LF,
            ..Default::default()
        });
        let bytes = renderer.render(&sheet(), &customer()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "A;B\nSeed;Price\nBasil, sweet;12.5\n"
        );
    }

    #[test]
    fn test_blank_sheet_is_empty() {
        let bytes = CsvRenderer::default()
            .render(&CustomerSheet::new("c1", "Blank"), &customer())
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_gap_rows_are_kept() {
        let sheet = CustomerSheet::new("c1", "Gaps").set_cell(2, 1, "x".into());
        let bytes = CsvRenderer::default().render(&sheet, &customer()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), ",\r\n,\r\n,x\r\n");
    }
}
