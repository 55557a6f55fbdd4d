use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

use crate::cli::dto::catalog_dto::ServiceTroubleshootRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::core::util::format_util::FormatUtil;
use crate::domain::apm::service::errors_service::{
    aggregate_errors_by, bucket_rows, count_renderer, RESOURCE_FACET, SPANS_AGGREGATE_PATH,
};
use crate::domain::common::model::{CellValue, NormalizedRow, TimeRange};
use crate::domain::common::service::time_expression::resolve_time_range;
use crate::domain::logs::service::logs_service::{log_rows, logs_renderer, LOGS_SEARCH_PATH, LOGS_SORT};
use crate::domain::normalize::compute::compute_values;
use crate::domain::query::query_builder::{build, RequestShape};
use crate::domain::query::query_spec::{Aggregation, QuerySpec};
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer};
use crate::errors::validation_error;

pub const HIGH_ERROR_RATE: f64 = 0.05;
pub const SLOW_P95_MS: f64 = 500.0;
const TOP_ERRORS_LIMIT: u32 = 10;
const ERROR_LOGS_LIMIT: u32 = 10;
const SUMMARY_RESOURCES: usize = 3;

/// Totals feeding the overview table and the summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApmOverview {
    pub total_spans: f64,
    pub error_spans: f64,
    pub p95_ms: f64,
}

impl ApmOverview {
    /// Errors over total; 0 when there is no traffic.
    pub fn error_rate(&self) -> f64 {
        if self.total_spans <= 0.0 {
            return 0.0;
        }
        self.error_spans / self.total_spans.max(1.0)
    }
}

/// Title annotations shared by every block of the view.
struct ViewContext<'a> {
    service: &'a str,
    env: Option<&'a str>,
    cluster: Option<&'a str>,
    from: &'a str,
}

impl ViewContext<'_> {
    fn annotate(&self, renderer: TableRenderer) -> TableRenderer {
        renderer
            .annotate("service", Some(self.service))
            .annotate("env", self.env)
            .annotate("cluster", self.cluster)
            .annotate("from", Some(self.from))
    }
}

fn base_spec(req: &ServiceTroubleshootRequest) -> QuerySpec {
    QuerySpec::builder()
        .service(Some(req.service.clone()))
        .env(req.env.clone())
        .tag("cluster", req.cluster.as_deref())
        .compute(Aggregation::Count)
        .compute(Aggregation::Pc95("duration".to_string()))
        .build()
}

fn errors_spec(req: &ServiceTroubleshootRequest) -> QuerySpec {
    QuerySpec::builder()
        .service(Some(req.service.clone()))
        .env(req.env.clone())
        .tag("cluster", req.cluster.as_deref())
        .errors_only()
        .build()
}

fn logs_spec(req: &ServiceTroubleshootRequest) -> QuerySpec {
    QuerySpec::builder()
        .service(Some(req.service.clone()))
        .env(req.env.clone())
        .clause("status:error")
        .tag("cluster", req.cluster.as_deref())
        .limit(ERROR_LOGS_LIMIT)
        .sort(Some(LOGS_SORT.to_string()))
        .build()
}

async fn aggregate(
    api: &dyn ApiTransport,
    spec: &QuerySpec,
    range: &TimeRange,
) -> Result<(Value, Value)> {
    let body = build(spec, range, RequestShape::Aggregate)?.to_value();
    debug!("Aggregate: {}", spec.search_string());
    let response = api.post(SPANS_AGGREGATE_PATH, &body).await?;
    Ok((body, response))
}

fn overview_rows(overview: &ApmOverview) -> Vec<NormalizedRow> {
    [
        ("total_spans", FormatUtil::decimal(overview.total_spans, 0)),
        ("error_spans", FormatUtil::decimal(overview.error_spans, 0)),
        ("error_rate", FormatUtil::percent(overview.error_rate())),
        ("p95_latency_ms", format!("{:.2}", overview.p95_ms)),
    ]
    .into_iter()
    .map(|(metric, value)| NormalizedRow::new().with("metric", metric).with("value", value))
    .collect()
}

/// `name (count)` for the first resources with a non-blank name.
fn top_pairs(rows: &[NormalizedRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| {
            let name = match row.get(RESOURCE_FACET)? {
                CellValue::Text(s) if !s.trim().is_empty() => s.clone(),
                _ => return None,
            };
            let count = row.get("count").and_then(CellValue::as_f64).unwrap_or(0.0);
            Some(format!("{} ({})", name, FormatUtil::decimal(count, 0)))
        })
        .take(SUMMARY_RESOURCES)
        .collect()
}

pub fn summary_lines(overview: &ApmOverview, top_resources: &[String]) -> Vec<String> {
    let rate = FormatUtil::percent(overview.error_rate());
    let mut lines = vec![
        if overview.error_rate() >= HIGH_ERROR_RATE {
            format!("- High error rate ({})", rate)
        } else {
            format!("- Low error rate ({})", rate)
        },
        if overview.p95_ms >= SLOW_P95_MS {
            format!("- Elevated p95 latency ({:.0} ms)", overview.p95_ms)
        } else {
            format!("- p95 latency ok ({:.0} ms)", overview.p95_ms)
        },
    ];
    if !top_resources.is_empty() {
        lines.push(format!("- Top error resources: {}", top_resources.join(", ")));
    }
    lines
}

pub async fn troubleshoot(api: &dyn ApiTransport, req: ServiceTroubleshootRequest) -> Result<CommandReport> {
    troubleshoot_at(api, req, Utc::now()).await
}

/// Overview, error count and top error resources from span analytics, then
/// the latest error logs. The range always ends now.
pub async fn troubleshoot_at(
    api: &dyn ApiTransport,
    req: ServiceTroubleshootRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let range = resolve_time_range(&req.from, "now", reference)?;
    let mut report = CommandReport::new();

    let (body, response) = aggregate(api, &base_spec(&req), &range).await?;
    let totals = compute_values(&response);
    report = report.exchange(ApiExchange::new("APM overview", Some(body), response));

    let (body, response) = aggregate(api, &errors_spec(&req), &range).await?;
    let error_spans = compute_values(&response).get("c0").copied().unwrap_or(0.0);
    report = report.exchange(ApiExchange::new("APM errors", Some(body), response));

    let (body, response) = aggregate_errors_by(
        api,
        &req.service,
        req.env.as_deref(),
        req.cluster.as_deref(),
        &range,
        RESOURCE_FACET,
        TOP_ERRORS_LIMIT,
    )
    .await?;
    let top_rows = bucket_rows(&response, RESOURCE_FACET);
    report = report.exchange(ApiExchange::new("APM top resources", Some(body), response));

    let logs_spec = logs_spec(&req);
    let body = build(&logs_spec, &range, RequestShape::SearchBody)?.to_value();
    let response = api.post(LOGS_SEARCH_PATH, &body).await?;
    let logs = log_rows(&response);
    report = report.exchange(ApiExchange::new("Logs search", Some(body), response));

    let overview = ApmOverview {
        total_spans: totals.get("c0").copied().unwrap_or(0.0),
        error_spans,
        p95_ms: totals
            .get("c1")
            .copied()
            .map(FormatUtil::duration_to_ms)
            .unwrap_or(0.0),
    };
    debug!("Troubleshoot overview for {}: {:?}", req.service, overview);

    let ctx = ViewContext {
        service: &req.service,
        env: req.env.as_deref(),
        cluster: req.cluster.as_deref(),
        from: &req.from,
    };

    let overview_table = ctx
        .annotate(TableRenderer::new("APM overview"))
        .column(ColumnSpec::text("metric"))
        .column(ColumnSpec::text("value"))
        .render(&overview_rows(&overview));
    let top_table = ctx
        .annotate(count_renderer("Top error resources (resource_name)", RESOURCE_FACET))
        .render(&top_rows);
    let logs_view = if logs.is_empty() {
        View::Panel {
            title: ctx.annotate(TableRenderer::new("Logs")).plan(&[]).title_line(),
            lines: vec!["No logs data in the selected range.".to_string()],
        }
    } else {
        View::Table(ctx.annotate(logs_renderer("Last error logs")).render(&logs))
    };

    Ok(report
        .view(View::Table(overview_table))
        .view(View::Table(top_table))
        .view(logs_view)
        .view(View::Panel {
            title: "Summary".to_string(),
            lines: summary_lines(&overview, &top_pairs(&top_rows)),
        }))
}
