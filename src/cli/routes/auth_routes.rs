use anyhow::Result;
use clap::Subcommand;

use crate::app_state::AppState;
use crate::cli::controller::auth::AuthController;
use crate::domain::render::report::CommandReport;

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Validate the API key against the configured site
    Status,
}

pub async fn auth_routes(state: &AppState, command: AuthCommand) -> Result<CommandReport> {
    match command {
        AuthCommand::Status => AuthController::status(state).await,
    }
}
