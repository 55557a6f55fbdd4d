use anyhow::Result;
use clap::Subcommand;

use crate::app_state::AppState;
use crate::cli::controller::catalog::CatalogController;
use crate::cli::dto::catalog_dto::{ServiceApplyRequest, ServiceGetRequest, ServiceTroubleshootRequest};
use crate::domain::render::report::CommandReport;

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List Service Catalog entities
    List,
    /// Get a Service Catalog entity by name
    Get(ServiceGetRequest),
    /// Create or update a Service Catalog entity (schema v3)
    Apply(ServiceApplyRequest),
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// APM and logs troubleshooting view for one service
    Troubleshoot(ServiceTroubleshootRequest),
}

pub async fn services_routes(state: &AppState, command: ServicesCommand) -> Result<CommandReport> {
    match command {
        ServicesCommand::List => CatalogController::list(state).await,
        ServicesCommand::Get(req) => CatalogController::get(state, req).await,
        ServicesCommand::Apply(req) => CatalogController::apply(state, req).await,
    }
}

pub async fn service_routes(state: &AppState, command: ServiceCommand) -> Result<CommandReport> {
    match command {
        ServiceCommand::Troubleshoot(req) => CatalogController::troubleshoot(state, req).await,
    }
}
