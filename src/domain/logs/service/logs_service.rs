use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

use crate::cli::dto::logs_dto::LogsQueryRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::common::model::NormalizedRow;
use crate::domain::common::service::time_expression::resolve_time_range;
use crate::domain::normalize::raw_record::data_items;
use crate::domain::normalize::standard_fields::log_row;
use crate::domain::query::query_builder::{build, RequestShape};
use crate::domain::query::query_spec::QuerySpec;
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer, ValueFormat, MESSAGE_LIMIT};
use crate::errors::validation_error;

pub const LOGS_SEARCH_PATH: &str = "/api/v2/logs/events/search";

/// Newest first.
pub const LOGS_SORT: &str = "-timestamp";

/// Columns of every logs table; `service` is hoisted when constant.
pub fn logs_renderer(title: &str) -> TableRenderer {
    TableRenderer::new(title)
        .column(ColumnSpec::new("timestamp", ValueFormat::Time))
        .column(ColumnSpec::text("service").hoistable())
        .column(ColumnSpec::text("status"))
        .column(ColumnSpec::new("message", ValueFormat::Truncate(MESSAGE_LIMIT)))
}

pub fn log_rows(response: &Value) -> Vec<NormalizedRow> {
    let items = data_items(response);
    if items.is_empty() && response.get("data").is_some_and(|d| !d.is_array()) {
        warn!("Logs response 'data' is not a list; nothing to render");
    }
    items.iter().map(log_row).collect()
}

pub async fn query_logs(api: &dyn ApiTransport, req: LogsQueryRequest) -> Result<CommandReport> {
    query_logs_at(api, req, Utc::now()).await
}

pub async fn query_logs_at(
    api: &dyn ApiTransport,
    req: LogsQueryRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let range = resolve_time_range(&req.from, &req.to, reference)?;
    let spec = QuerySpec::builder()
        .service(req.service.clone())
        .env(req.env.clone())
        .query(req.query.clone())
        .limit(req.limit)
        .sort(Some(LOGS_SORT.to_string()))
        .build();
    let payload = build(&spec, &range, RequestShape::SearchBody)?;
    debug!("Logs search query: {}", spec.search_string());

    let body = payload.to_value();
    let response = api.post(LOGS_SEARCH_PATH, &body).await?;
    let rows = log_rows(&response);
    debug!("Logs search returned {} row(s)", rows.len());

    let table = logs_renderer("Logs")
        .annotate("env", req.env.as_deref())
        .render(&rows);

    Ok(CommandReport::new()
        .exchange(ApiExchange::new("logs", Some(body), response))
        .view(View::Table(table)))
}
