use anyhow::Result;

use crate::app_state::AppState;
use crate::domain::render::report::CommandReport;

pub struct AuthController;

impl AuthController {
    pub async fn status(state: &AppState) -> Result<CommandReport> {
        state.auth_status().await
    }
}
