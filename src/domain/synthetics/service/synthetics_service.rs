use anyhow::Result;
use tracing::debug;
use validator::Validate;

use crate::cli::dto::resource_dto::SyntheticsTriggerRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::query::query_builder::synthetics_trigger_body;
use crate::domain::render::report::CommandReport;
use crate::errors::validation_error;

/// Triggers every given test in a single call.
pub async fn trigger_tests(api: &dyn ApiTransport, req: SyntheticsTriggerRequest) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let body = synthetics_trigger_body(&req.public_ids)?;
    debug!("Triggering {} synthetic test(s)", req.public_ids.len());
    let response = api.post("/api/v1/synthetics/tests/trigger", &body).await?;
    Ok(CommandReport::json("synthetics trigger", Some(body), response))
}
