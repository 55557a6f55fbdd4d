use anyhow::Result;
use clap::Subcommand;

use crate::app_state::AppState;
use crate::cli::controller::logs::LogsController;
use crate::cli::dto::logs_dto::LogsQueryRequest;
use crate::domain::render::report::CommandReport;

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Search logs in a time range
    Query(LogsQueryRequest),
}

pub async fn logs_routes(state: &AppState, command: LogsCommand) -> Result<CommandReport> {
    match command {
        LogsCommand::Query(req) => LogsController::query(state, req).await,
    }
}
