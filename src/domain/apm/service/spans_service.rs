use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

use crate::cli::dto::apm_dto::{SpansListRequest, SpansSearchRequest};
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::common::model::NormalizedRow;
use crate::domain::common::service::time_expression::resolve_time_range;
use crate::domain::normalize::raw_record::data_items;
use crate::domain::normalize::standard_fields::span_row;
use crate::domain::query::query_builder::{build, RequestPayload, RequestShape};
use crate::domain::query::query_spec::QuerySpec;
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer, ValueFormat, ERROR_MESSAGE_LIMIT};
use crate::errors::validation_error;

pub const SPANS_LIST_PATH: &str = "/api/v2/spans/events";
pub const SPANS_SEARCH_PATH: &str = "/api/v2/spans/events/search";

fn spans_renderer() -> TableRenderer {
    TableRenderer::new("Spans")
        .column(ColumnSpec::new("timestamp", ValueFormat::Time))
        .column(ColumnSpec::text("env").hoistable())
        .column(ColumnSpec::text("service").hoistable())
        .column(ColumnSpec::text("resource"))
        .column(ColumnSpec::text("method"))
        .column(ColumnSpec::text("status"))
        .column(ColumnSpec::new("duration_s", ValueFormat::Fixed(3)))
        .column(ColumnSpec::new("error_message", ValueFormat::Truncate(ERROR_MESSAGE_LIMIT)))
}

fn span_rows(response: &Value) -> Vec<NormalizedRow> {
    data_items(response).iter().map(span_row).collect()
}

fn spans_report(label: &str, request: Value, response: Value) -> CommandReport {
    let rows = span_rows(&response);
    debug!("{} returned {} span(s)", label, rows.len());
    let table = spans_renderer().render(&rows);
    CommandReport::new()
        .exchange(ApiExchange::new(label, Some(request), response))
        .view(View::Table(table))
}

pub async fn list_spans(api: &dyn ApiTransport, req: SpansListRequest) -> Result<CommandReport> {
    list_spans_at(api, req, Utc::now()).await
}

pub async fn list_spans_at(
    api: &dyn ApiTransport,
    req: SpansListRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let range = resolve_time_range(&req.from, &req.to, reference)?;
    let spec = QuerySpec::builder()
        .service(req.service)
        .env(req.env)
        .query(req.query)
        .limit(req.limit)
        .sort(Some(req.sort))
        .build();

    let payload = build(&spec, &range, RequestShape::GetParams)?;
    debug!("Spans list params: {:?}", payload.params());
    let response = api.get(SPANS_LIST_PATH, payload.params()).await?;
    Ok(spans_report("spans list", payload.to_value(), response))
}

pub async fn search_spans(api: &dyn ApiTransport, req: SpansSearchRequest) -> Result<CommandReport> {
    search_spans_at(api, req, Utc::now()).await
}

pub async fn search_spans_at(
    api: &dyn ApiTransport,
    req: SpansSearchRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let range = resolve_time_range(&req.from, &req.to, reference)?;
    let spec = QuerySpec::builder()
        .query(Some(req.query))
        .env(req.env)
        .limit(req.limit)
        .sort(Some(req.sort))
        .build();

    let body = match build(&spec, &range, RequestShape::JsonApiSearch)? {
        RequestPayload::Body(body) => body,
        params => params.to_value(),
    };
    debug!("Spans search query: {}", spec.search_string());
    let response = api.post(SPANS_SEARCH_PATH, &body).await?;
    Ok(spans_report("spans search", body, response))
}
