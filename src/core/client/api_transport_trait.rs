use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::errors::AppError;

/// Synchronous-looking call/response access to the platform API.
///
/// `query` pairs are appended to the URL; `body` is sent as JSON.
/// Non-2xx responses surface as `AppError::UpstreamError`, never retried.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, AppError>;

    /// Site the transport targets (e.g. `datadoghq.eu`).
    fn site(&self) -> &str;

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, AppError> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, AppError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }
}
