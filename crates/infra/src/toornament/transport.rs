//! Shared request path for every Toornament call

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use rosterlink_common::resilience::RateLimiter;
use rosterlink_domain::constants::API_KEY_HEADER;
use rosterlink_domain::{Result, RosterLinkError};
use serde_json::Value;
use tracing::debug;

use crate::http::HttpClient;

/// HTTP client, API key and rate limiter shared by all Toornament requests
#[derive(Debug)]
pub struct Transport {
    http: HttpClient,
    limiter: Arc<RateLimiter>,
    api_key: String,
    base_url: String,
}

impl Transport {
    pub fn new(
        http: HttpClient,
        limiter: Arc<RateLimiter>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            limiter,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for an API path such as `/oauth/v2/token`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url).header(API_KEY_HEADER, &self.api_key)
    }

    /// Wait for a rate-limit slot, then send.
    ///
    /// Throttling is the last step before dispatch. The response is
    /// returned whatever its status.
    pub async fn dispatch(&self, builder: RequestBuilder) -> Result<Response> {
        self.limiter.throttle().await;
        self.http.send(builder).await
    }

    /// Turn a non-success response into `RemoteApi { status, body }`.
    pub async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Toornament request rejected");
        Err(RosterLinkError::RemoteApi { status: status.as_u16(), body })
    }

    /// Parse a JSON body; an empty body reads as `null`.
    pub async fn read_json(response: Response) -> Result<Value> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RosterLinkError::Network(format!("Failed to read response body: {e}")))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| RosterLinkError::Parse(format!("Invalid JSON response: {e}")))
    }
}
