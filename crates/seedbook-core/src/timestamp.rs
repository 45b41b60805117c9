//! Timestamp helpers
//!
//! Sheets and customers keep millisecond-precision UTC timestamps, the unit
//! they are persisted in, so a value read back from the store compares equal
//! to the one that was written.

use chrono::{DateTime, Utc};

/// A timestamp as it arrives from storage
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampInput {
    /// Milliseconds since the Unix epoch
    EpochMillis(i64),
    /// An already-typed instant
    DateTime(DateTime<Utc>),
    /// Anything else (missing field, wrong type, garbage text)
    Unrecognized,
}

impl TimestampInput {
    /// Resolve to an instant, falling back to "now" for anything unusable
    pub fn resolve(&self) -> DateTime<Utc> {
        self.try_resolve().unwrap_or_else(now_millis)
    }

    /// Resolve to an instant, or `None` when the input is unusable
    pub fn try_resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            TimestampInput::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
            TimestampInput::DateTime(dt) => Some(truncate_to_millis(*dt)),
            TimestampInput::Unrecognized => None,
        }
    }
}

impl From<i64> for TimestampInput {
    fn from(ms: i64) -> Self {
        TimestampInput::EpochMillis(ms)
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(dt: DateTime<Utc>) -> Self {
        TimestampInput::DateTime(dt)
    }
}

/// The current time, truncated to whole milliseconds
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

/// Drop sub-millisecond precision
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}
