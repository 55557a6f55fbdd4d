//! Field tables for the item kinds the CLI renders, plus the timestamp and
//! duration readers shared by spans and logs.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::util::format_util::FormatUtil;
use crate::domain::common::model::{CellValue, NormalizedRow};
use crate::domain::common::service::time_expression::parse_instant;
use crate::domain::normalize::field_spec::{normalize_row, resolve, FieldSpec};
use crate::domain::normalize::raw_record::RawRecord;

pub const TIMESTAMP: FieldSpec = FieldSpec::new("timestamp", &["timestamp", "start_timestamp", "start"]);

pub const SPAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("env", &["env"]),
    FieldSpec::new("service", &["service"]),
    FieldSpec::new("resource", &["resource_name", "resource.name", "resource"]),
    FieldSpec::new("method", &["http.method", "http_method", "method"])
        .with_fallback(&["operation_name"]),
    FieldSpec::new("status", &["http.status_code", "status_code", "status"]),
    FieldSpec::new("error_message", &["error.message", "error.type", "error", "error.msg"]),
];

pub const SPAN_DURATION: FieldSpec = FieldSpec::new("duration_s", &["duration", "duration.ms"]);

pub const LOG_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("service", &["service"]),
    FieldSpec::new("status", &["status"]),
    FieldSpec::new("message", &["message"]),
];

pub const MONITOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", &["id"]),
    FieldSpec::new("name", &["name"]),
    FieldSpec::new("type", &["type"]),
    FieldSpec::new("state", &["overall_state", "overallState"]),
];

pub const CATALOG_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("service", &["name"]),
    FieldSpec::new("owner", &["owner"]),
    FieldSpec::new("tier", &["tier"]).with_fallback(&["included_schema.spec.tier"]),
    FieldSpec::new("tags", &["tags"]),
];

/// ISO strings or epoch nanoseconds. Unparseable strings are kept as text.
pub fn timestamp(record: &RawRecord<'_>) -> Option<CellValue> {
    match resolve(record, &TIMESTAMP)? {
        Value::String(s) => Some(
            parse_instant(&s)
                .map(CellValue::Time)
                .unwrap_or(CellValue::Text(s)),
        ),
        Value::Number(n) => n.as_f64().and_then(from_epoch_nanos).map(CellValue::Time),
        _ => None,
    }
}

fn from_epoch_nanos(ns: f64) -> Option<DateTime<Utc>> {
    if !ns.is_finite() {
        return None;
    }
    Some(DateTime::from_timestamp_nanos(ns as i64))
}

/// Span duration in seconds; raw values are ns when large, ms otherwise.
pub fn span_duration(record: &RawRecord<'_>) -> Option<CellValue> {
    let raw = match resolve(record, &SPAN_DURATION)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Some(CellValue::Number(FormatUtil::span_duration_seconds(raw)))
}

pub fn span_row(item: &Value) -> NormalizedRow {
    let record = RawRecord::new(item);
    let mut row = normalize_row(&record, SPAN_FIELDS);
    row.set(TIMESTAMP.column, timestamp(&record));
    row.set(SPAN_DURATION.column, span_duration(&record));
    row
}

pub fn log_row(item: &Value) -> NormalizedRow {
    let record = RawRecord::new(item);
    let mut row = normalize_row(&record, LOG_FIELDS);
    row.set(TIMESTAMP.column, timestamp(&record));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn span_row_reads_every_location() {
        let item = json!({
            "id": "abc",
            "attributes": {
                "service": "checkout",
                "resource_name": "POST /cart",
                "operation_name": "rack.request",
                "start_timestamp": "2024-01-01T10:15:30.123Z",
                "custom": {"env": "prd", "duration": 1_500_000_000u64},
                "tags": ["http.status_code:500", "error.message:boom"],
            }
        });
        let row = span_row(&item);
        assert_eq!(row.get("service"), Some(&CellValue::from("checkout")));
        assert_eq!(row.get("env"), Some(&CellValue::from("prd")));
        assert_eq!(row.get("resource"), Some(&CellValue::from("POST /cart")));
        assert_eq!(row.get("method"), Some(&CellValue::from("rack.request")));
        assert_eq!(row.get("status"), Some(&CellValue::from("500")));
        assert_eq!(row.get("error_message"), Some(&CellValue::from("boom")));
        assert_eq!(row.get("duration_s"), Some(&CellValue::Number(1.5)));
        match row.get("timestamp") {
            Some(CellValue::Time(t)) => {
                assert_eq!(t.format("%H:%M:%S").to_string(), "10:15:30")
            }
            other => panic!("unexpected timestamp {other:?}"),
        }
    }

    #[test]
    fn nanosecond_epoch_timestamps() {
        let item = json!({"attributes": {"start": 1_704_103_200_000_000_000i64}});
        assert_eq!(
            timestamp(&RawRecord::new(&item)),
            Some(CellValue::Time(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()))
        );
    }

    #[test]
    fn odd_timestamps_degrade_to_text() {
        let item = json!({"attributes": {"timestamp": "yesterday-ish"}});
        assert_eq!(
            timestamp(&RawRecord::new(&item)),
            Some(CellValue::from("yesterday-ish"))
        );
    }

    #[test]
    fn millisecond_durations() {
        let item = json!({"attributes": {"duration": 250}});
        assert_eq!(span_duration(&RawRecord::new(&item)), Some(CellValue::Number(0.25)));
    }

    #[test]
    fn log_row_prefers_top_level_then_nested_bag() {
        let item = json!({"attributes": {
            "status": "error",
            "timestamp": "2024-01-01T09:00:00Z",
            "attributes": {"service": "billing", "message": "payment declined"},
        }});
        let row = log_row(&item);
        assert_eq!(row.get("service"), Some(&CellValue::from("billing")));
        assert_eq!(row.get("status"), Some(&CellValue::from("error")));
        assert_eq!(row.get("message"), Some(&CellValue::from("payment declined")));
    }

    #[test]
    fn catalog_tier_comes_from_included_schema() {
        let item = json!({
            "attributes": {"name": "checkout", "owner": "team-a", "tags": ["env:prd"]},
            "included_schema": {"spec": {"tier": "1"}},
        });
        let row = normalize_row(&RawRecord::new(&item), CATALOG_FIELDS);
        assert_eq!(row.get("tier"), Some(&CellValue::from("1")));
        assert_eq!(row.get("tags"), Some(&CellValue::from("env:prd")));
    }
}
