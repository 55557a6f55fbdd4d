use std::cmp::Ordering;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

use crate::cli::dto::metrics_dto::MetricsQueryRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::common::model::{CellValue, NormalizedRow, TimeRange};
use crate::domain::common::service::time_expression::{epoch_seconds, resolve_time_range};
use crate::domain::query::query_builder::RequestPayload;
use crate::domain::query::query_params::QueryParams;
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::sparkline::sparkline;
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer, ValueFormat};
use crate::errors::validation_error;

pub const METRICS_QUERY_PATH: &str = "/api/v1/query";

/// One timeseries of a v1 query response. Points are `(ts_ms, value)`;
/// a null value is kept so the point count matches the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metric: Option<String>,
    pub scope: Option<String>,
    pub points: Vec<(f64, Option<f64>)>,
}

impl Series {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let points = value
            .get("pointlist")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|p| {
                        let ts = p.get(0)?.as_f64()?;
                        Some((ts, p.get(1).and_then(Value::as_f64)))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            metric: text("metric"),
            scope: text("scope"),
            points,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|(_, v)| *v).collect()
    }

    pub fn last(&self) -> Option<(f64, Option<f64>)> {
        self.points.last().copied()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.last().and_then(|(_, v)| v)
    }

    /// `tag:value` part of the comma-separated scope, else the whole scope.
    pub fn scope_part(&self, tag: Option<&str>) -> Option<String> {
        let scope = self.scope.as_deref()?;
        let Some(tag) = tag else {
            return Some(scope.to_string());
        };
        let prefix = format!("{}:", tag);
        let part = scope
            .split(',')
            .map(str::trim)
            .find(|part| part.starts_with(&prefix))
            .unwrap_or(scope);
        Some(part.to_string())
    }
}

pub fn series_of(response: &Value) -> Vec<Series> {
    response
        .get("series")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(Series::from_value).collect())
        .unwrap_or_default()
}

/// Highest last value first; series without one go to the end.
fn by_last_value_desc(a: &Series, b: &Series) -> Ordering {
    match (a.last_value(), b.last_value()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn metrics_params(query: &str, range: &TimeRange, rollup: Option<u32>) -> QueryParams {
    QueryParams::new()
        .push("from", Some(epoch_seconds(range.start)))
        .push("to", Some(epoch_seconds(range.end)))
        .push("query", Some(query))
        .push("rollup", rollup)
}

/// One `GET /api/v1/query` call, returning the sent params and the response.
pub async fn fetch_series(
    api: &dyn ApiTransport,
    query: &str,
    range: &TimeRange,
    rollup: Option<u32>,
) -> Result<(Value, Value)> {
    let params = metrics_params(query, range, rollup);
    debug!("Metrics query: {}", query);
    let response = api.get(METRICS_QUERY_PATH, params.as_slice()).await?;
    Ok((RequestPayload::Params(params).to_value(), response))
}

fn series_row(series: &Series, scope_column: &str, req: &MetricsQueryRequest) -> NormalizedRow {
    let values = series.values();
    let mut row = NormalizedRow::new().with("pts", series.points.len() as f64);
    row.set("metric", series.metric.clone().map(CellValue::Text));
    row.set(
        scope_column,
        series.scope_part(req.scope_tag.as_deref()).map(CellValue::Text),
    );

    if let Some((ts, value)) = series.last() {
        row.set(
            "last_ts",
            DateTime::from_timestamp_millis(ts as i64).map(CellValue::Time),
        );
        row.set("last", value.map(CellValue::Number));
    }
    if !values.is_empty() {
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        row = row.with("avg", avg).with("min", min).with("max", max);
    }
    if req.spark {
        let line = sparkline(&values, req.spark_points);
        row.set("spark", Some(line).filter(|l| !l.is_empty()).map(CellValue::Text));
    }
    row
}

pub async fn query_metrics(api: &dyn ApiTransport, req: MetricsQueryRequest) -> Result<CommandReport> {
    query_metrics_at(api, req, Utc::now()).await
}

pub async fn query_metrics_at(
    api: &dyn ApiTransport,
    req: MetricsQueryRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let range = resolve_time_range(&req.from, &req.to, reference)?;
    let (request, response) = fetch_series(api, &req.query, &range, req.rollup).await?;

    let mut series = series_of(&response);
    series.sort_by(by_last_value_desc);
    series.truncate(req.limit);
    debug!("Rendering {} series", series.len());

    let scope_column = req.scope_tag.clone().unwrap_or_else(|| "scope".to_string());
    let rows: Vec<NormalizedRow> = series
        .iter()
        .map(|s| series_row(s, &scope_column, &req))
        .collect();

    let mut renderer = TableRenderer::new("Metrics (latest point per series)")
        .column(ColumnSpec::text("metric").hoistable())
        .column(ColumnSpec::text(&scope_column))
        .column(ColumnSpec::new("pts", ValueFormat::Decimal))
        .column(ColumnSpec::new("last_ts", ValueFormat::Time))
        .column(ColumnSpec::new("last", ValueFormat::Decimal))
        .column(ColumnSpec::new("avg", ValueFormat::Decimal))
        .column(ColumnSpec::new("min", ValueFormat::Decimal))
        .column(ColumnSpec::new("max", ValueFormat::Decimal));
    if req.spark {
        renderer = renderer.column(ColumnSpec::text("spark"));
    }

    Ok(CommandReport::new()
        .exchange(ApiExchange::new(&req.query, Some(request), response))
        .view(View::Table(renderer.render(&rows))))
}
