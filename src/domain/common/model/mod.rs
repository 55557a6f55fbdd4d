//! Shared domain types (TimeRange, CellValue, NormalizedRow)

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Absolute bounds of one query. `start <= end` always holds once built
/// through `resolve_time_range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Display-ready value of one cell. Absence is modelled by the key being
/// missing from the row, not by a variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Time(DateTime<Utc>),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Time(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(t: DateTime<Utc>) -> Self {
        CellValue::Time(t)
    }
}

/// One flat record: column name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRow(BTreeMap<String, CellValue>);

impl NormalizedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `column`; `None` leaves the column absent.
    pub fn set(&mut self, column: &str, value: Option<CellValue>) {
        match value {
            Some(v) => {
                self.0.insert(column.to_string(), v);
            }
            None => {
                self.0.remove(column);
            }
        }
    }

    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.set(column, Some(value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
