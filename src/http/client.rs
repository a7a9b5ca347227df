//! HTTP client for the health tracker API
//!
//! Sends JSON requests with the session's bearer token, measures latency and
//! classifies every completed exchange as a `RequestOutcome`.

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::models::{RequestOutcome, Session};
use crate::utils::Timer;

/// Failures that prevent an exchange from completing
///
/// Any of these means the server could not be talked to, which invalidates
/// the rest of the run.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Timeout after {timeout_secs} seconds calling {url}")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("Failed to connect to {url} after {duration_ms}ms")]
    ConnectionRefused { url: String, duration_ms: u64 },

    #[error("Request to {url} failed after {duration_ms}ms: {reason}")]
    RequestFailed {
        url: String,
        duration_ms: u64,
        reason: String,
    },

    #[error("Invalid JSON body from {url}: {reason}")]
    InvalidBody { url: String, reason: String },
}

/// Authenticated client for the tracker API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create a client with the default 30 second timeout
    #[cfg(test)]
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, 30)
    }

    /// Create client with custom timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Issue one request and classify the response
    pub async fn call(
        &self,
        session: &Session,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<RequestOutcome, TransportError> {
        let url = self.build_url(endpoint);
        debug!("Sending {} request to {}", method, url);

        let mut req_builder = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = session.token() {
            req_builder = req_builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        if let Some(body) = body {
            req_builder = req_builder.body(body.to_string());
        }

        let timer = Timer::start(format!("{method} {endpoint}"));

        let response = match req_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let duration_ms = timer.elapsed_ms();
                let failure = if e.is_timeout() {
                    TransportError::Timeout {
                        url,
                        timeout_secs: self.timeout_secs,
                    }
                } else if e.is_connect() {
                    TransportError::ConnectionRefused { url, duration_ms }
                } else {
                    TransportError::RequestFailed {
                        url,
                        duration_ms,
                        reason: e.to_string(),
                    }
                };
                error!("{}", failure);
                return Err(failure);
            }
        };

        let status = response.status();
        let duration_ms = timer.elapsed_ms();
        info!(
            "{} {} ({}) took {}ms",
            method,
            endpoint,
            status.as_u16(),
            duration_ms
        );

        let declares_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = response.text().await.map_err(|e| TransportError::RequestFailed {
            url: url.clone(),
            duration_ms: timer.elapsed_ms(),
            reason: format!("Failed to read response body: {e}"),
        })?;

        let parsed = if status != StatusCode::NO_CONTENT && declares_json && !text.trim().is_empty()
        {
            let value = serde_json::from_str::<Value>(&text).map_err(|e| {
                let failure = TransportError::InvalidBody {
                    url: url.clone(),
                    reason: e.to_string(),
                };
                error!("{}", failure);
                failure
            })?;
            Some(value)
        } else {
            None
        };

        Ok(classify(status, duration_ms, parsed))
    }

    /// Convenience method for GET request
    pub async fn get(
        &self,
        session: &Session,
        endpoint: &str,
    ) -> Result<RequestOutcome, TransportError> {
        self.call(session, endpoint, Method::GET, None).await
    }

    /// Convenience method for POST request
    pub async fn post(
        &self,
        session: &Session,
        endpoint: &str,
        body: &Value,
    ) -> Result<RequestOutcome, TransportError> {
        self.call(session, endpoint, Method::POST, Some(body)).await
    }

    /// Convenience method for PATCH request
    pub async fn patch(
        &self,
        session: &Session,
        endpoint: &str,
        body: &Value,
    ) -> Result<RequestOutcome, TransportError> {
        self.call(session, endpoint, Method::PATCH, Some(body)).await
    }

    /// DELETE with an empty JSON object body, as the backend expects
    pub async fn delete(
        &self,
        session: &Session,
        endpoint: &str,
    ) -> Result<RequestOutcome, TransportError> {
        let empty = Value::Object(Default::default());
        self.call(session, endpoint, Method::DELETE, Some(&empty))
            .await
    }
}

/// Tag a completed exchange as `Ok` or `Err`
fn classify(status: StatusCode, duration_ms: u64, body: Option<Value>) -> RequestOutcome {
    if status.is_success() {
        RequestOutcome::Ok {
            status: status.as_u16(),
            duration_ms,
            body,
        }
    } else {
        let error = match body {
            Some(value) if !value.is_null() => value,
            _ => Value::String(status.canonical_reason().unwrap_or("").to_string()),
        };
        RequestOutcome::Err {
            status: Some(status.as_u16()),
            duration_ms,
            error,
        }
    }
}
