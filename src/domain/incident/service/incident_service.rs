use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use crate::cli::dto::resource_dto::IncidentCreateRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::render::report::CommandReport;
use crate::errors::validation_error;

fn incident_body(req: &IncidentCreateRequest) -> Value {
    json!({
        "data": {
            "type": "incidents",
            "attributes": {
                "title": req.title.trim(),
                "severity": req.severity.trim(),
            }
        }
    })
}

pub async fn create_incident(api: &dyn ApiTransport, req: IncidentCreateRequest) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let body = incident_body(&req);
    let response = api.post("/api/v2/incidents", &body).await?;
    debug!("Created incident '{}' ({})", req.title, req.severity);
    Ok(CommandReport::json("incident", Some(body), response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::recording_transport::RecordingTransport;
    use crate::errors::{exit_code_for, AppError};
    use reqwest::Method;

    #[tokio::test]
    async fn posts_json_api_envelope() {
        let api = RecordingTransport::with_responses(vec![json!({"data": {"id": "inc-1"}})]);
        let req = IncidentCreateRequest {
            title: "Checkout 5xx".into(),
            severity: "SEV-1".into(),
        };
        create_incident(&api, req).await.unwrap();

        let requests = api.requests();
        let sent = &requests[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.path, "/api/v2/incidents");
        assert_eq!(
            sent.body,
            Some(json!({"data": {"type": "incidents", "attributes": {"title": "Checkout 5xx", "severity": "SEV-1"}}}))
        );
    }

    #[tokio::test]
    async fn empty_title_is_rejected_before_sending() {
        let api = RecordingTransport::new();
        let req = IncidentCreateRequest {
            title: String::new(),
            severity: "SEV-2".into(),
        };
        let err = create_incident(&api, req).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidArgument(_))));
        assert_eq!(exit_code_for(&err), 2);
        assert!(api.requests().is_empty());
    }
}
