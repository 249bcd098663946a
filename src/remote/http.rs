//! JSON over HTTP remote invoker.
//!
//! Each operation is a `POST {endpoint}/{operation}` with body
//! `{"args": [...]}`. A 2xx reply body is decoded as JSON and handed back
//! as-is; judging its shape is left to [`RemoteOutcome::interpret`].
//!
//! [`RemoteOutcome::interpret`]: crate::interfaces::RemoteOutcome::interpret

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::RemoteConfig;
use crate::interfaces::remote_invoker::Result;
use crate::interfaces::{RemoteError, RemoteInvoker, RemotePayload};

/// Errors building an HTTP invoker.
#[derive(Debug, thiserror::Error)]
pub enum HttpInvokerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Remote invoker over HTTP.
///
/// Transport failures, timeouts, 429, and 5xx replies are retried with
/// exponential backoff and surface as [`RemoteError::Communication`] once
/// retries run out.
pub struct HttpRemoteInvoker {
    client: Client,
    endpoint: String,
    config: RemoteConfig,
}

impl HttpRemoteInvoker {
    pub fn new(config: &RemoteConfig) -> std::result::Result<Self, HttpInvokerError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/'))
            .filter(|e| !e.is_empty())
            .ok_or_else(|| HttpInvokerError::Config("remote endpoint not configured".to_string()))?
            .to_string();

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            endpoint,
            config: config.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.config.min_delay())
            .with_max_delay(self.config.max_delay())
            .with_max_times(self.config.max_retries)
            .with_jitter()
    }

    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}", self.endpoint, operation)
    }

    /// Retry 429 (rate limit) and 5xx (server errors).
    fn is_retryable_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    async fn post(&self, operation: &str, args: &[Value]) -> Result<RemotePayload> {
        let url = self.operation_url(operation);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "args": args }))
            .send()
            .await
            .map_err(|e| RemoteError::Communication(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Err(RemoteError::NoContent {
                operation: operation.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = format!(
                "HTTP {} - {}",
                status,
                body.chars().take(200).collect::<String>()
            );
            if Self::is_retryable_status(status) {
                warn!(url = %url, status = %status, "Remote call returned retryable status");
                return Err(RemoteError::Communication(detail));
            }
            return Err(RemoteError::Unclassified(detail));
        }

        let payload: RemotePayload = response
            .json()
            .await
            .map_err(|e| RemoteError::Unclassified(format!("undecodable reply: {}", e)))?;

        debug!(url = %url, "Remote call completed");
        Ok(payload)
    }
}

#[async_trait]
impl RemoteInvoker for HttpRemoteInvoker {
    async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<RemotePayload> {
        (|| async { self.post(operation, &args).await })
            .retry(self.backoff())
            .when(|e| matches!(e, RemoteError::Communication(_)))
            .notify(|err, delay| {
                warn!(operation = %operation, error = %err, ?delay, "Retrying remote call");
            })
            .await
    }
}
