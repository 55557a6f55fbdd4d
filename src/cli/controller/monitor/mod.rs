use anyhow::Result;

use crate::app_state::AppState;
use crate::cli::dto::monitors_dto::{MonitorListRequest, MonitorMuteRequest};
use crate::domain::render::report::CommandReport;

pub struct MonitorController;

impl MonitorController {
    pub async fn list(state: &AppState, req: MonitorListRequest) -> Result<CommandReport> {
        state.list_monitors(req).await
    }

    pub async fn mute(state: &AppState, req: MonitorMuteRequest) -> Result<CommandReport> {
        state.mute_monitor(req).await
    }
}
