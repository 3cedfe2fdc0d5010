//! `/chat/completions` request dispatch.

use super::{ByteStream, ChatTransport};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::Value;
use std::time::Duration;

/// Client for OpenAI-compatible chat APIs.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Build a client from resolved API configuration.
    pub fn new(config: &ApiConfig, timeout: Duration) -> Self {
        // Fall back to reqwest defaults if builder creation fails for any reason.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut req = self.http.post(&url).json(request);
        if !self.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status(status, body));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for ApiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let payload: Value = self.post(request).await?.json().await?;
        parse_chat_payload(payload)
    }

    async fn chat_stream(&self, request: &ChatRequest) -> Result<ByteStream, ApiError> {
        let response = self.post(request).await?;
        Ok(Box::pin(response.bytes_stream().map_err(ApiError::from)))
    }
}

/// Parse one non-streaming response body, surfacing backend-reported errors.
///
/// Some providers return `{error:{message}}` with a 200 status; that shape
/// takes precedence over the normal choices payload.
pub(crate) fn parse_chat_payload(payload: Value) -> Result<ChatResponse, ApiError> {
    if let Some(message) = payload
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
    {
        return Err(ApiError::Backend(message.to_string()));
    }
    serde_json::from_value(payload).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}
