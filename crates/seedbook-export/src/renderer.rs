//! Renderer interface and shared helpers

use std::path::Path;

use seedbook_core::{Customer, CustomerSheet};

use crate::error::{ExportError, ExportResult};

/// Turns a sheet plus its customer into document bytes
pub trait SheetRenderer {
    /// Render the document
    fn render(&self, sheet: &CustomerSheet, customer: &Customer) -> ExportResult<Vec<u8>>;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    /// MIME type for sharing
    fn mime_type(&self) -> &'static str;
}

/// Render and write straight to a file
pub fn export_to_file<R: SheetRenderer + ?Sized, P: AsRef<Path>>(
    renderer: &R,
    sheet: &CustomerSheet,
    customer: &Customer,
    path: P,
) -> ExportResult<()> {
    let bytes = renderer.render(sheet, customer)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Share file name such as `Green_Acres_Spring_order.txt`
///
/// Letters, digits, `-` and `_` are kept, whitespace becomes `_`, anything
/// else is dropped.
pub fn suggested_file_name(sheet: &CustomerSheet, customer: &Customer, extension: &str) -> String {
    let stem = [sanitize(customer.name()), sanitize(sheet.title())]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let stem = if stem.is_empty() { "sheet".to_string() } else { stem };
    format!("{}.{}", stem, extension)
}

fn sanitize(text: &str) -> String {
    let mut out = String::new();
    for word in text.split_whitespace() {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if word.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('_');
        }
        out.push_str(&word);
    }
    out
}

/// Refuse to render a sheet with a customer record that does not own it
pub(crate) fn check_owner(sheet: &CustomerSheet, customer: &Customer) -> ExportResult<()> {
    match customer.id() {
        Some(id) if !sheet.customer_id().is_empty() && id != sheet.customer_id() => {
            Err(ExportError::OwnerMismatch {
                sheet_owner: sheet.customer_id().to_string(),
                customer_id: id.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Rows and columns up to the last non-empty cell, or `None` for a blank sheet
pub(crate) fn used_extent(sheet: &CustomerSheet) -> Option<(usize, usize)> {
    sheet
        .cells()
        .filter(|(_, cell)| !cell.is_empty())
        .fold(None, |acc, (addr, _)| match acc {
            None => Some((addr.row + 1, addr.col + 1)),
            Some((rows, cols)) => Some((rows.max(addr.row + 1), cols.max(addr.col + 1))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedbook_core::SheetShape;

    #[test]
    fn test_suggested_file_name() {
        let customer = Customer::new("Green Acres", "12345678", "");
        let sheet = CustomerSheet::new("c1", "Spring order #2 (draft)");
        assert_eq!(
            suggested_file_name(&sheet, &customer, "txt"),
            "Green_Acres_Spring_order_2_draft.txt"
        );

        let customer = Customer::new("???", "12345678", "");
        let sheet = CustomerSheet::new("c1", "!!!");
        assert_eq!(suggested_file_name(&sheet, &customer, "csv"), "sheet.csv");
    }

    #[test]
    fn test_check_owner() {
        let sheet = CustomerSheet::new("c1", "Orders");
        assert!(check_owner(&sheet, &Customer::new("Ana", "12345678", "")).is_ok());
        assert!(check_owner(&sheet, &Customer::new("Ana", "12345678", "").with_id("c1")).is_ok());
        assert!(matches!(
            check_owner(&sheet, &Customer::new("Ana", "12345678", "").with_id("c2")),
            Err(ExportError::OwnerMismatch { .. })
        ));
    }

    #[test]
    fn test_used_extent() {
        let sheet = CustomerSheet::with_shape("c1", "t", SheetShape::new(10, 5));
        assert_eq!(used_extent(&sheet), None);

        let sheet = sheet.set_cell(3, 1, "x".into()).set_cell(1, 4, "y".into());
        assert_eq!(used_extent(&sheet), Some((4, 5)));
    }
}
