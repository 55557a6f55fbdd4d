use anyhow::Result;

use crate::app_state::AppState;
use crate::cli::dto::logs_dto::LogsQueryRequest;
use crate::domain::render::report::CommandReport;

pub struct LogsController;

impl LogsController {
    pub async fn query(state: &AppState, req: LogsQueryRequest) -> Result<CommandReport> {
        state.query_logs(req).await
    }
}
