use anyhow::Result;
use clap::Subcommand;

use crate::app_state::AppState;
use crate::cli::controller::monitor::MonitorController;
use crate::cli::dto::monitors_dto::{MonitorListRequest, MonitorMuteRequest};
use crate::domain::render::report::CommandReport;

#[derive(Debug, Subcommand)]
pub enum MonitorsCommand {
    /// List monitors, optionally filtered by name, tags or ids
    List(MonitorListRequest),
    /// Mute a monitor
    Mute(MonitorMuteRequest),
}

pub async fn monitors_routes(state: &AppState, command: MonitorsCommand) -> Result<CommandReport> {
    match command {
        MonitorsCommand::List(req) => MonitorController::list(state, req).await,
        MonitorsCommand::Mute(req) => MonitorController::mute(state, req).await,
    }
}
