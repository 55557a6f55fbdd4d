use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::render::report::{ApiExchange, CommandReport, View};

/// `GET /api/v1/validate`: prints the site and whether the API key is valid.
pub async fn status(api: &dyn ApiTransport) -> Result<CommandReport> {
    let response = api.get("/api/v1/validate", &[]).await?;
    let valid = response.get("valid").and_then(Value::as_bool).unwrap_or(false);
    debug!("API key valid: {}", valid);

    Ok(CommandReport::new()
        .exchange(ApiExchange::new("validate", None, response))
        .view(View::Panel {
            title: "ddctl auth status".to_string(),
            lines: vec![
                format!("site: {}", api.site()),
                format!("api_key_valid: {}", valid),
            ],
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::recording_transport::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn reports_site_and_validity() {
        let api = RecordingTransport::with_responses(vec![json!({"valid": true})]);
        let report = status(&api).await.unwrap();

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/api/v1/validate");
        match &report.views[0] {
            View::Panel { lines, .. } => {
                assert_eq!(lines[0], "site: datadoghq.test");
                assert_eq!(lines[1], "api_key_valid: true");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_object_response_is_invalid() {
        let api = RecordingTransport::with_responses(vec![json!("forbidden")]);
        let report = status(&api).await.unwrap();
        assert!(report.views[0].to_string().contains("api_key_valid: false"));
    }
}
