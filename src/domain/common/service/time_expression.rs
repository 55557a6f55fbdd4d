use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::domain::common::model::TimeRange;
use crate::errors::AppError;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses `now`, `now-<N><m|h|d>`, `-<N><m|h|d>` or an ISO-8601 datetime
/// against `reference`. Naive datetimes are taken as UTC.
pub fn parse(expr: &str, reference: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
    let invalid = || AppError::InvalidTimeExpression(expr.to_string());
    let trimmed = expr.trim();

    if trimmed == "now" {
        return Ok(reference);
    }

    let relative = trimmed.strip_prefix("now").unwrap_or(trimmed);
    if let Some(offset) = relative.strip_prefix('-') {
        return parse_relative(offset, reference).ok_or_else(invalid);
    }

    parse_instant(trimmed).ok_or_else(invalid)
}

/// `<N><unit>` with N a non-negative integer and unit one of m/h/d.
fn parse_relative(offset: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let unit = offset.chars().last()?;
    let amount = &offset[..offset.len() - unit.len_utf8()];

    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: i64 = amount.parse().ok()?;

    let delta = match unit {
        'm' => Duration::try_minutes(n)?,
        'h' => Duration::try_hours(n)?,
        'd' => Duration::try_days(n)?,
        _ => return None,
    };

    reference.checked_sub_signed(delta)
}

/// ISO-8601 instant: RFC 3339, or a naive datetime/date taken as UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Resolves a `--from`/`--to` pair against one shared reference instant.
pub fn resolve_time_range(
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Result<TimeRange, AppError> {
    let start = parse(from, reference)?;
    let end = parse(to, reference)?;

    if end < start {
        return Err(AppError::InvalidTimeRange {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    Ok(TimeRange { start, end })
}

/// RFC 3339 in UTC, as the search and aggregate endpoints expect.
pub fn to_iso8601(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Whole epoch seconds, as the v1 metrics query endpoint expects.
pub fn epoch_seconds(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}
