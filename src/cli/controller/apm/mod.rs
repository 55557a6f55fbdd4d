use anyhow::Result;

use crate::app_state::AppState;
use crate::cli::dto::apm_dto::{ErrorsRateRequest, ErrorsTopResourcesRequest, SpansListRequest, SpansSearchRequest};
use crate::domain::render::report::CommandReport;

pub struct ApmController;

impl ApmController {
    pub async fn list_spans(state: &AppState, req: SpansListRequest) -> Result<CommandReport> {
        state.list_spans(req).await
    }

    pub async fn search_spans(state: &AppState, req: SpansSearchRequest) -> Result<CommandReport> {
        state.search_spans(req).await
    }

    pub async fn top_error_resources(state: &AppState, req: ErrorsTopResourcesRequest) -> Result<CommandReport> {
        state.top_error_resources(req).await
    }

    pub async fn error_rate(state: &AppState, req: ErrorsRateRequest) -> Result<CommandReport> {
        state.error_rate(req).await
    }
}
