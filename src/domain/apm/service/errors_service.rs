use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

use crate::cli::dto::apm_dto::{ErrorsRateRequest, ErrorsTopResourcesRequest};
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::common::model::{NormalizedRow, TimeRange};
use crate::domain::common::service::time_expression::resolve_time_range;
use crate::domain::normalize::compute::{bucket_key, count, extract_buckets};
use crate::domain::query::query_builder::{build, RequestShape};
use crate::domain::query::query_spec::QuerySpec;
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer, ValueFormat};
use crate::errors::validation_error;

pub const SPANS_AGGREGATE_PATH: &str = "/api/v2/spans/analytics/aggregate";
pub const RESOURCE_FACET: &str = "resource_name";

/// Error spans of one service grouped by `facet`, as `(request, response)`.
pub async fn aggregate_errors_by(
    api: &dyn ApiTransport,
    service: &str,
    env: Option<&str>,
    cluster: Option<&str>,
    range: &TimeRange,
    facet: &str,
    limit: u32,
) -> Result<(Value, Value)> {
    let spec = QuerySpec::builder()
        .service(Some(service.to_string()))
        .env(env.map(str::to_string))
        .tag("cluster", cluster)
        .errors_only()
        .group_by(facet, limit)
        .build();
    let body = build(&spec, range, RequestShape::Aggregate)?.to_value();
    debug!("Error aggregate by {}: {}", facet, spec.search_string());
    let response = api.post(SPANS_AGGREGATE_PATH, &body).await?;
    Ok((body, response))
}

/// One row per bucket: the facet value and its error count.
pub fn bucket_rows(response: &Value, facet: &str) -> Vec<NormalizedRow> {
    let buckets = extract_buckets(response);
    if buckets.is_empty() {
        debug!("Aggregate response has no buckets");
    }
    buckets
        .iter()
        .map(|bucket| {
            let mut row = NormalizedRow::new();
            row.set(facet, bucket_key(bucket, facet).map(Into::into));
            match count(bucket) {
                Some(n) => row.set("count", Some(n.into())),
                None => warn!("Bucket without a count: {}", bucket),
            }
            row
        })
        .collect()
}

pub fn count_renderer(title: &str, facet: &str) -> TableRenderer {
    TableRenderer::new(title)
        .column(ColumnSpec::text(facet))
        .column(ColumnSpec::new("count", ValueFormat::Decimal))
}

pub async fn top_resources(api: &dyn ApiTransport, req: ErrorsTopResourcesRequest) -> Result<CommandReport> {
    top_resources_at(api, req, Utc::now()).await
}

pub async fn top_resources_at(
    api: &dyn ApiTransport,
    req: ErrorsTopResourcesRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let range = resolve_time_range(&req.from, &req.to, reference)?;
    let (body, response) =
        aggregate_errors_by(api, &req.service, req.env.as_deref(), None, &range, RESOURCE_FACET, req.limit).await?;

    let rows = bucket_rows(&response, RESOURCE_FACET);
    let table = count_renderer("Top resources by error count", RESOURCE_FACET)
        .annotate("service", Some(&req.service))
        .annotate("env", req.env.as_deref())
        .render(&rows);

    Ok(CommandReport::new()
        .exchange(ApiExchange::new("errors top-resources", Some(body), response))
        .view(View::Table(table)))
}

pub async fn error_rate(api: &dyn ApiTransport, req: ErrorsRateRequest) -> Result<CommandReport> {
    error_rate_at(api, req, Utc::now()).await
}

pub async fn error_rate_at(
    api: &dyn ApiTransport,
    req: ErrorsRateRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let range = resolve_time_range(&req.from, &req.to, reference)?;
    let facet = req.group_by.trim();
    let (body, response) =
        aggregate_errors_by(api, &req.service, req.env.as_deref(), None, &range, facet, req.limit).await?;

    let rows = bucket_rows(&response, facet);
    let table = count_renderer(&format!("Error count by {}", facet), facet)
        .annotate("service", Some(&req.service))
        .annotate("env", req.env.as_deref())
        .render(&rows);

    Ok(CommandReport::new()
        .exchange(ApiExchange::new("errors rate", Some(body), response))
        .view(View::Table(table)))
}
