//! Paginated text document
//!
//! The printable export: a customer header, the grid laid out in fixed-width
//! columns, and a page footer. Pages are separated by a form feed so the
//! output can go straight to a printer or a text-to-PDF step.

use std::fmt::Write;

use seedbook_core::{CellData, Customer, CustomerSheet};

use crate::error::ExportResult;
use crate::options::ExportOptions;
use crate::renderer::{check_owner, SheetRenderer};

const PAGE_BREAK: char = '\x0c';
const COLUMN_GAP: &str = "  ";
const CLIP_MARK: char = '~';

/// Renders a sheet as a paginated plain-text document
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    options: ExportOptions,
}

struct RenderedCell {
    text: String,
    numeric: bool,
}

struct RenderedRow {
    number: usize,
    cells: Vec<RenderedCell>,
}

impl TextRenderer {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn rendered_rows(&self, sheet: &CustomerSheet) -> Vec<RenderedRow> {
        sheet
            .rows()
            .enumerate()
            .filter(|(_, row)| !self.options.skip_empty_rows || row.iter().any(|c| !c.is_empty()))
            .map(|(index, row)| RenderedRow {
                number: index + 1,
                cells: row.iter().map(|cell| self.render_cell(cell)).collect(),
            })
            .collect()
    }

    fn render_cell(&self, cell: &CellData) -> RenderedCell {
        let text = cell.display_value();
        let max = self.options.max_column_width.max(1);
        let text = if text.chars().count() > max {
            let mut clipped: String = text.chars().take(max - 1).collect();
            clipped.push(CLIP_MARK);
            clipped
        } else {
            text
        };
        RenderedCell {
            text,
            numeric: cell.is_numeric(),
        }
    }

    fn column_widths(&self, columns: usize, rows: &[RenderedRow]) -> Vec<usize> {
        let mut widths: Vec<usize> = (0..columns)
            .map(|col| {
                if self.options.column_letters {
                    CustomerSheet::column_label(col).chars().count()
                } else {
                    1
                }
            })
            .collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.text.chars().count());
            }
        }
        widths
    }

    fn write_page_header(
        &self,
        out: &mut String,
        sheet: &CustomerSheet,
        customer: &Customer,
        first_page: bool,
    ) -> ExportResult<()> {
        writeln!(out, "Customer: {}", customer.name())?;
        if !customer.phone().is_empty() {
            writeln!(out, "Phone: {}", customer.phone())?;
        }
        if first_page && !customer.notes().is_empty() {
            writeln!(out, "Notes: {}", customer.notes())?;
        }
        writeln!(out, "Sheet: {}", sheet.title())?;
        writeln!(
            out,
            "Last updated: {} UTC",
            sheet.updated_at().format("%Y-%m-%d %H:%M")
        )?;
        out.push('\n');
        Ok(())
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

impl SheetRenderer for TextRenderer {
    fn render(&self, sheet: &CustomerSheet, customer: &Customer) -> ExportResult<Vec<u8>> {
        check_owner(sheet, customer)?;

        let rows = self.rendered_rows(sheet);
        let widths = self.column_widths(sheet.column_count(), &rows);
        let number_width = if self.options.row_numbers {
            rows.last().map_or(1, |r| r.number.to_string().len())
        } else {
            0
        };

        let per_page = self.options.rows_per_page.max(1);
        let pages: Vec<&[RenderedRow]> = if rows.is_empty() {
            vec![&rows[..]]
        } else {
            rows.chunks(per_page).collect()
        };
        let total = pages.len();

        let mut out = String::new();
        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                out.push(PAGE_BREAK);
            }
            self.write_page_header(&mut out, sheet, customer, index == 0)?;

            if self.options.column_letters {
                let mut line = String::new();
                if self.options.row_numbers {
                    write!(line, "{:>w$}", "", w = number_width)?;
                }
                for (col, width) in widths.iter().enumerate() {
                    if col > 0 || self.options.row_numbers {
                        line.push_str(COLUMN_GAP);
                    }
                    write!(line, "{:<w$}", CustomerSheet::column_label(col), w = width)?;
                }
                push_line(&mut out, &line);
            }

            if page.is_empty() {
                push_line(&mut out, "(no data)");
            }

            for row in page.iter() {
                let mut line = String::new();
                if self.options.row_numbers {
                    write!(line, "{:>w$}", row.number, w = number_width)?;
                }
                for (col, (cell, width)) in row.cells.iter().zip(&widths).enumerate() {
                    if col > 0 || self.options.row_numbers {
                        line.push_str(COLUMN_GAP);
                    }
                    if cell.numeric {
                        write!(line, "{:>w$}", cell.text, w = width)?;
                    } else {
                        write!(line, "{:<w$}", cell.text, w = width)?;
                    }
                }
                push_line(&mut out, &line);
            }

            out.push('\n');
            if index + 1 == total {
                writeln!(out, "{}", sheet.summary())?;
            }
            writeln!(out, "Page {} of {}", index + 1, total)?;
        }

        Ok(out.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }
}
