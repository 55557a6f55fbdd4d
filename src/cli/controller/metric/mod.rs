use anyhow::Result;

use crate::app_state::AppState;
use crate::cli::dto::metrics_dto::{K8sResourcesRequest, MetricsQueryRequest, TagCardinalityRequest};
use crate::domain::render::report::CommandReport;

pub struct MetricController;

impl MetricController {
    pub async fn query(state: &AppState, req: MetricsQueryRequest) -> Result<CommandReport> {
        state.query_metrics(req).await
    }

    pub async fn k8s_resources(state: &AppState, req: K8sResourcesRequest) -> Result<CommandReport> {
        state.k8s_resources(req).await
    }

    pub async fn tag_cardinality(state: &AppState, req: TagCardinalityRequest) -> Result<CommandReport> {
        state.tag_cardinality(req).await
    }
}
