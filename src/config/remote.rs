//! Remote system configuration.

use std::time::Duration;

use serde::Deserialize;

/// Remote invoker endpoint and retry policy.
///
/// Retries happen inside the invoker. Callers never retry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL; operations are posted to `{endpoint}/{operation}`.
    /// No endpoint means no HTTP invoker can be built.
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum retries after the first attempt for transient failures.
    pub max_retries: usize,
    /// First backoff delay in milliseconds.
    pub min_delay_ms: u64,
    /// Backoff delay cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 30,
            max_retries: 3,
            min_delay_ms: 100,
            max_delay_ms: 2_000,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}
