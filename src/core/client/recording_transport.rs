//! In-memory `ApiTransport` for service tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::core::client::api_transport_trait::ApiTransport;
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued responses in order and records every request.
/// An exhausted queue answers `null`.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<Value, AppError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Value>) -> Self {
        let transport = Self::new();
        for r in responses {
            transport.push_response(r);
        }
        transport
    }

    pub fn push_response(&self, response: Value) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, err: AppError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiTransport for RecordingTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, AppError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            query: query.to_vec(),
            body: body.cloned(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }

    fn site(&self) -> &str {
        "datadoghq.test"
    }
}
