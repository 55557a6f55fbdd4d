//! Service Catalog CRUD and the per-service troubleshooting view

use anyhow::Result;

use crate::app_state::AppState;
use crate::cli::dto::catalog_dto::{ServiceApplyRequest, ServiceGetRequest, ServiceTroubleshootRequest};
use crate::domain::render::report::CommandReport;

pub struct CatalogController;

impl CatalogController {
    pub async fn list(state: &AppState) -> Result<CommandReport> {
        state.list_services().await
    }

    pub async fn get(state: &AppState, req: ServiceGetRequest) -> Result<CommandReport> {
        state.get_service(req).await
    }

    pub async fn apply(state: &AppState, req: ServiceApplyRequest) -> Result<CommandReport> {
        state.apply_service(req).await
    }

    pub async fn troubleshoot(state: &AppState, req: ServiceTroubleshootRequest) -> Result<CommandReport> {
        state.troubleshoot_service(req).await
    }
}
