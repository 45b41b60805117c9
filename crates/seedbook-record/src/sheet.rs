//! Sheet records

use std::collections::BTreeMap;

use seedbook_core::{CellData, CustomerSheet, SheetShape, DEFAULT_COLS, DEFAULT_ROWS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RecordError, RecordResult};
use crate::fields::{
    self, json_type_name, read_count, read_string, read_timestamp, write_timestamp,
};
use crate::key::CellKey;

/// Title given to a stored sheet that has none
const UNTITLED: &str = "Untitled";

/// One flattened cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub value: String,
    pub is_numeric: bool,
}

/// A sheet as written to the document store
///
/// The store assigns the document id, so it is not part of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRecord {
    pub customer_id: String,
    pub title: String,
    pub row_count: usize,
    pub column_count: usize,
    pub cells: BTreeMap<String, CellRecord>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
}

impl SheetRecord {
    /// Serialize to a JSON document body
    pub fn to_document(&self) -> RecordResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Flatten a sheet, writing every cell including empty ones
pub fn encode_sheet(sheet: &CustomerSheet) -> SheetRecord {
    let cells = sheet
        .cells()
        .map(|(addr, cell)| {
            (
                CellKey::new(addr.row, addr.col).to_string(),
                CellRecord {
                    value: cell.value().to_string(),
                    is_numeric: cell.is_numeric(),
                },
            )
        })
        .collect();

    SheetRecord {
        customer_id: sheet.customer_id().to_string(),
        title: sheet.title().to_string(),
        row_count: sheet.row_count(),
        column_count: sheet.column_count(),
        cells,
        created_at: write_timestamp(sheet.created_at()),
        updated_at: write_timestamp(sheet.updated_at()),
    }
}

/// Flatten a sheet straight to a JSON document body
pub fn encode_sheet_document(sheet: &CustomerSheet) -> RecordResult<Value> {
    encode_sheet(sheet).to_document()
}

/// Rebuild a sheet from a stored document
///
/// `id` is the store's document id. The grid is sized from `rowCount` and
/// `columnCount` (10×5 when absent, clamped to the sheet limits) and filled
/// with empty cells before stored cells are copied in. Cell keys that are
/// malformed or fall outside the declared shape are dropped; the grid is
/// never grown to fit them.
pub fn decode_sheet(id: Option<&str>, document: &Value) -> RecordResult<CustomerSheet> {
    let map = document
        .as_object()
        .ok_or_else(|| RecordError::NotAnObject(json_type_name(document)))?;

    let declared = SheetShape::new(
        read_count(map, fields::ROW_COUNT).unwrap_or(DEFAULT_ROWS),
        read_count(map, fields::COLUMN_COUNT).unwrap_or(DEFAULT_COLS),
    );
    let shape = declared.clamped();
    if shape != declared {
        log::warn!(
            "sheet {:?}: declared shape {}x{} clamped to {}x{}",
            id,
            declared.rows,
            declared.columns,
            shape.rows,
            shape.columns
        );
    }

    let mut rows = vec![vec![CellData::empty(); shape.columns]; shape.rows];
    if let Some(cells) = map.get(fields::CELLS).and_then(Value::as_object) {
        fill_cells(id, &mut rows, shape, cells);
    }

    let customer_id = read_string(map, fields::CUSTOMER_ID).unwrap_or_default();
    let title = read_string(map, fields::TITLE)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| {
            log::debug!("sheet {:?}: missing title, using {:?}", id, UNTITLED);
            UNTITLED.to_string()
        });

    let created_at = read_timestamp(map, fields::CREATED_AT).resolve();
    let updated_at = read_timestamp(map, fields::UPDATED_AT).resolve();

    Ok(CustomerSheet::from_rows(
        id.map(str::to_string),
        customer_id,
        title,
        rows,
        created_at,
        updated_at,
    )?)
}

/// Rebuild a sheet from raw JSON bytes
pub fn decode_sheet_slice(id: Option<&str>, bytes: &[u8]) -> RecordResult<CustomerSheet> {
    let document: Value = serde_json::from_slice(bytes)?;
    decode_sheet(id, &document)
}

fn fill_cells(
    id: Option<&str>,
    rows: &mut [Vec<CellData>],
    shape: SheetShape,
    cells: &Map<String, Value>,
) {
    let mut dropped = 0usize;

    for (raw_key, entry) in cells {
        let Some(key) = CellKey::parse(raw_key) else {
            log::warn!("sheet {:?}: ignoring malformed cell key {:?}", id, raw_key);
            dropped += 1;
            continue;
        };

        if key.row >= shape.rows || key.col >= shape.columns {
            dropped += 1;
            continue;
        }

        match decode_cell(entry) {
            Some(cell) => rows[key.row][key.col] = cell,
            None => {
                log::warn!("sheet {:?}: ignoring unreadable cell {}", id, raw_key);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        log::warn!(
            "sheet {:?}: dropped {} cell entries for a {}x{} grid",
            id,
            dropped,
            shape.rows,
            shape.columns
        );
    }
}

fn decode_cell(entry: &Value) -> Option<CellData> {
    let (value, stored_flag) = match entry {
        Value::Object(obj) => {
            let value = match obj.get(fields::VALUE) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                None | Some(Value::Null) => String::new(),
                Some(_) => return None,
            };
            (value, obj.get(fields::IS_NUMERIC).and_then(Value::as_bool))
        }
        Value::String(s) => (s.clone(), None),
        _ => return None,
    };

    let cell = CellData::from_value(value);
    if let Some(flag) = stored_flag {
        if flag != cell.is_numeric() {
            log::debug!(
                "cell {:?}: stored isNumeric={} disagrees with its value",
                cell.value(),
                flag
            );
        }
    }
    Some(cell)
}
