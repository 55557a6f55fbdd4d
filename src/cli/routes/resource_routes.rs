use anyhow::Result;
use clap::Subcommand;

use crate::app_state::AppState;
use crate::cli::controller::resource::ResourceController;
use crate::cli::dto::resource_dto::{DashboardGetRequest, IncidentCreateRequest, SyntheticsTriggerRequest};
use crate::domain::render::report::CommandReport;

#[derive(Debug, Subcommand)]
pub enum DashboardsCommand {
    /// Fetch a dashboard definition by id
    Get(DashboardGetRequest),
}

#[derive(Debug, Subcommand)]
pub enum IncidentsCommand {
    /// Declare an incident
    Create(IncidentCreateRequest),
}

#[derive(Debug, Subcommand)]
pub enum SyntheticsCommand {
    /// Trigger one or more synthetic tests in a single call
    Trigger(SyntheticsTriggerRequest),
}

pub async fn dashboards_routes(state: &AppState, command: DashboardsCommand) -> Result<CommandReport> {
    match command {
        DashboardsCommand::Get(req) => ResourceController::get_dashboard(state, req).await,
    }
}

pub async fn incidents_routes(state: &AppState, command: IncidentsCommand) -> Result<CommandReport> {
    match command {
        IncidentsCommand::Create(req) => ResourceController::create_incident(state, req).await,
    }
}

pub async fn synthetics_routes(state: &AppState, command: SyntheticsCommand) -> Result<CommandReport> {
    match command {
        SyntheticsCommand::Trigger(req) => ResourceController::trigger_synthetics(state, req).await,
    }
}
