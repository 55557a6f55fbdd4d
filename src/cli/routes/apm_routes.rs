use anyhow::Result;
use clap::Subcommand;

use crate::app_state::AppState;
use crate::cli::controller::apm::ApmController;
use crate::cli::dto::apm_dto::{ErrorsRateRequest, ErrorsTopResourcesRequest, SpansListRequest, SpansSearchRequest};
use crate::domain::render::report::CommandReport;

#[derive(Debug, Subcommand)]
pub enum ApmCommand {
    /// Span events
    Spans {
        #[command(subcommand)]
        command: SpansCommand,
    },
    /// Error analytics over spans
    Errors {
        #[command(subcommand)]
        command: ErrorsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SpansCommand {
    /// List recent spans
    List(SpansListRequest),
    /// Search spans with a query
    Search(SpansSearchRequest),
}

#[derive(Debug, Subcommand)]
pub enum ErrorsCommand {
    /// Resources with the most error spans
    TopResources(ErrorsTopResourcesRequest),
    /// Error span count grouped by a facet
    Rate(ErrorsRateRequest),
}

pub async fn apm_routes(state: &AppState, command: ApmCommand) -> Result<CommandReport> {
    match command {
        ApmCommand::Spans { command } => match command {
            SpansCommand::List(req) => ApmController::list_spans(state, req).await,
            SpansCommand::Search(req) => ApmController::search_spans(state, req).await,
        },
        ApmCommand::Errors { command } => match command {
            ErrorsCommand::TopResources(req) => ApmController::top_error_resources(state, req).await,
            ErrorsCommand::Rate(req) => ApmController::error_rate(state, req).await,
        },
    }
}
