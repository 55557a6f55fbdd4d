use anyhow::Result;
use clap::Subcommand;

use crate::app_state::AppState;
use crate::cli::controller::metric::MetricController;
use crate::cli::dto::metrics_dto::{K8sResourcesRequest, MetricsQueryRequest, TagCardinalityRequest};
use crate::domain::render::report::CommandReport;

#[derive(Debug, Subcommand)]
pub enum MetricsCommand {
    /// Timeseries query, latest point per series
    Query(MetricsQueryRequest),
    /// CPU and memory requests, limits and usage for a workload
    K8sResources(K8sResourcesRequest),
    /// Cardinality per tag of one metric
    TagCardinality(TagCardinalityRequest),
}

pub async fn metrics_routes(state: &AppState, command: MetricsCommand) -> Result<CommandReport> {
    match command {
        MetricsCommand::Query(req) => MetricController::query(state, req).await,
        MetricsCommand::K8sResources(req) => MetricController::k8s_resources(state, req).await,
        MetricsCommand::TagCardinality(req) => MetricController::tag_cardinality(state, req).await,
    }
}
