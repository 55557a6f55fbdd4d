use anyhow::Result;
use tracing::debug;
use validator::Validate;

use crate::cli::dto::resource_dto::DashboardGetRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::render::report::CommandReport;
use crate::errors::validation_error;

pub async fn get_dashboard(api: &dyn ApiTransport, req: DashboardGetRequest) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let id = req.id.trim();
    debug!("Fetching dashboard {}", id);
    let path = format!("/api/v1/dashboard/{}", urlencoding::encode(id));
    let response = api.get(&path, &[]).await?;
    Ok(CommandReport::json("dashboard", None, response))
}
