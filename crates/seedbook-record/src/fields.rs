//! Document field names and lenient field readers

use chrono::{DateTime, Utc};
use seedbook_core::TimestampInput;
use serde_json::{Map, Value};

pub const CUSTOMER_ID: &str = "customerId";
pub const TITLE: &str = "title";
pub const ROW_COUNT: &str = "rowCount";
pub const COLUMN_COUNT: &str = "columnCount";
pub const CELLS: &str = "cells";
pub const VALUE: &str = "value";
pub const IS_NUMERIC: &str = "isNumeric";
pub const NAME: &str = "name";
pub const PHONE: &str = "phone";
pub const NOTES: &str = "notes";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Read a string field; missing or non-string fields are `None`
pub fn read_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Read a non-negative integer field, accepting integral floats
pub fn read_count(map: &Map<String, Value>, key: &str) -> Option<usize> {
    let value = map.get(key)?;
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
        .map(|f| f as usize)
}

/// Classify a timestamp field
///
/// Accepts epoch milliseconds (integer or integral float), RFC 3339 text, and
/// `{seconds, nanoseconds}` objects as written by hosted document stores.
pub fn read_timestamp(map: &Map<String, Value>, key: &str) -> TimestampInput {
    match map.get(key) {
        Some(value) => timestamp_from_value(value),
        None => TimestampInput::Unrecognized,
    }
}

fn timestamp_from_value(value: &Value) -> TimestampInput {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(ms), _) => TimestampInput::EpochMillis(ms),
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => {
                TimestampInput::EpochMillis(f as i64)
            }
            _ => TimestampInput::Unrecognized,
        },
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| TimestampInput::DateTime(dt.with_timezone(&Utc)))
            .unwrap_or(TimestampInput::Unrecognized),
        Value::Object(obj) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64);
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            seconds
                .and_then(|s| DateTime::from_timestamp(s, nanos))
                .map(TimestampInput::DateTime)
                .unwrap_or(TimestampInput::Unrecognized)
        }
        _ => TimestampInput::Unrecognized,
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Timestamps are written as epoch milliseconds
pub fn write_timestamp(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}
