//! Dashboards, incidents and synthetics: single-call commands echoing JSON

use anyhow::Result;

use crate::app_state::AppState;
use crate::cli::dto::resource_dto::{DashboardGetRequest, IncidentCreateRequest, SyntheticsTriggerRequest};
use crate::domain::render::report::CommandReport;

pub struct ResourceController;

impl ResourceController {
    pub async fn get_dashboard(state: &AppState, req: DashboardGetRequest) -> Result<CommandReport> {
        state.get_dashboard(req).await
    }

    pub async fn create_incident(state: &AppState, req: IncidentCreateRequest) -> Result<CommandReport> {
        state.create_incident(req).await
    }

    pub async fn trigger_synthetics(state: &AppState, req: SyntheticsTriggerRequest) -> Result<CommandReport> {
        state.trigger_synthetics(req).await
    }
}
