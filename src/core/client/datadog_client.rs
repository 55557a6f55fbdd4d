use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::core::client::api_transport_trait::ApiTransport;
use crate::core::config::context_config::ApiContext;
use crate::errors::{transport_error, AppError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_KEY_HEADER: &str = "dd-api-key";
const APP_KEY_HEADER: &str = "dd-application-key";

/// reqwest-backed transport for `https://api.<site>`.
pub struct DatadogClient {
    client: Client,
    base_url: String,
    context: ApiContext,
}

impl DatadogClient {
    pub fn new(context: ApiContext) -> Result<Self, AppError> {
        let base_url = format!("https://api.{}", context.site.trim_end_matches('/'));
        Self::with_base_url(context, base_url)
    }

    pub fn with_base_url(context: ApiContext, base_url: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(Self::headers(&context)?)
            .build()
            .map_err(|e| AppError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            context,
        })
    }

    /// Key headers are only sent when configured.
    fn headers(context: &ApiContext) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in [
            (API_KEY_HEADER, context.api_key.as_deref()),
            (APP_KEY_HEADER, context.app_key.as_deref()),
        ] {
            if let Some(v) = value {
                let mut header = HeaderValue::from_str(v)
                    .map_err(|_| AppError::Config(format!("{} contains invalid characters", name)))?;
                header.set_sensitive(true);
                headers.insert(HeaderName::from_static(name), header);
            }
        }

        Ok(headers)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ApiTransport for DatadogClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {} params={:?}", method, url, query);

        let method_label = method.to_string();
        let mut req = self.client.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            debug!("request body: {}", b);
            req = req.json(b);
        }

        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;
        debug!("{} {} -> {}: {}", method_label, path, status.as_u16(), text);

        if !status.is_success() {
            return Err(AppError::upstream(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        // Some endpoints do not set a strict JSON content type.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    fn site(&self) -> &str {
        &self.context.site
    }
}
