use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use validator::Validate;

use crate::cli::dto::metrics_dto::K8sResourcesRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::core::util::format_util::{CpuUnit, FormatUtil};
use crate::domain::common::model::{NormalizedRow, TimeRange};
use crate::domain::common::service::time_expression::resolve_time_range;
use crate::domain::metric::service::metric_query_service::{fetch_series, series_of};
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer};
use crate::errors::{validation_error, AppError};

const MISSING: &str = "-";

/// Which aggregate a query feeds and how its raw value is scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Reading {
    /// Whole cores (`kubernetes.cpu.requests`/`limits`).
    Cores,
    /// nanocores/s from `kubernetes.cpu.usage.total.as_rate()`.
    Nanocores,
    Bytes,
}

struct ResourceQuery {
    resource: &'static str,
    column: &'static str,
    template: &'static str,
    reading: Reading,
}

const QUERIES: &[ResourceQuery] = &[
    ResourceQuery { resource: "cpu", column: "requests", template: "sum:kubernetes.cpu.requests{%}", reading: Reading::Cores },
    ResourceQuery { resource: "cpu", column: "limits", template: "sum:kubernetes.cpu.limits{%}", reading: Reading::Cores },
    ResourceQuery { resource: "cpu", column: "usage", template: "sum:kubernetes.cpu.usage.total{%}.as_rate()", reading: Reading::Nanocores },
    ResourceQuery { resource: "memory", column: "requests", template: "sum:kubernetes.memory.requests{%}", reading: Reading::Bytes },
    ResourceQuery { resource: "memory", column: "limits", template: "sum:kubernetes.memory.limits{%}", reading: Reading::Bytes },
    ResourceQuery { resource: "memory", column: "usage", template: "sum:container.memory.usage{%}", reading: Reading::Bytes },
];

/// `cluster:<c>[,kube_service:<s>][,kube_deployment:<d>]`
pub fn tag_filter(req: &K8sResourcesRequest) -> String {
    let mut filter = format!("cluster:{}", req.cluster.trim());
    let extra = [
        ("kube_service", req.kube_service.as_deref()),
        ("kube_deployment", req.kube_deployment.as_deref()),
    ];
    for (tag, value) in extra {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            filter.push_str(&format!(",{}:{}", tag, v));
        }
    }
    filter
}

fn format_reading(value: Option<f64>, reading: Reading, unit: CpuUnit) -> String {
    let Some(v) = value else {
        return MISSING.to_string();
    };
    match reading {
        Reading::Cores => FormatUtil::cpu(FormatUtil::cpu_from_cores(v, unit), unit),
        Reading::Nanocores => FormatUtil::cpu(FormatUtil::cpu_from_nanocores(v, unit), unit),
        Reading::Bytes => FormatUtil::bytes(v),
    }
}

pub async fn k8s_resources(api: &dyn ApiTransport, req: K8sResourcesRequest) -> Result<CommandReport> {
    k8s_resources_at(api, req, Utc::now()).await
}

pub async fn k8s_resources_at(
    api: &dyn ApiTransport,
    req: K8sResourcesRequest,
    reference: DateTime<Utc>,
) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let workload = req
        .kube_service
        .as_deref()
        .or(req.kube_deployment.as_deref())
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::MissingField("--kube-service or --kube-deployment".into()))?;

    let range: TimeRange = resolve_time_range(&req.from, &req.to, reference)?;
    let filter = tag_filter(&req);
    debug!("K8s resources for {}", filter);

    let mut report = CommandReport::new();
    let mut cpu = NormalizedRow::new().with("resource", "cpu");
    let mut memory = NormalizedRow::new().with("resource", "memory");

    for q in QUERIES {
        let query = q.template.replace('%', &filter);
        let (request, response) = fetch_series(api, &query, &range, Some(req.rollup)).await?;
        let last = series_of(&response)
            .first()
            .and_then(|s| s.last_value());
        if last.is_none() {
            warn!("No datapoints for {}", query);
        }

        let text = format_reading(last, q.reading, req.cpu_unit);
        let row = if q.resource == "cpu" { &mut cpu } else { &mut memory };
        row.set(q.column, Some(text.into()));
        report = report.exchange(ApiExchange::new(&query, Some(request), response));
    }

    let table = TableRenderer::new(&format!("K8s resources ({} @ {})", workload, req.cluster.trim()))
        .column(ColumnSpec::text("resource"))
        .column(ColumnSpec::text("requests"))
        .column(ColumnSpec::text("limits"))
        .column(ColumnSpec::text("usage"))
        .render(&[cpu, memory]);

    Ok(report.view(View::Table(table)))
}
