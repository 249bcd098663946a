//! Remote invocation interface.
//!
//! A remote call either delivers a positional payload or fails with one of
//! the [`RemoteError`] kinds. Interpreting a delivered payload is separate:
//! [`RemoteOutcome::interpret`] turns it into accepted, rejected, or malformed.

use async_trait::async_trait;
use serde_json::Value;

/// Result type for remote invocations.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Decoded reply of a remote call. Well-formed replies are a positional array;
/// any other delivered value, `null` included, is kept for interpretation.
pub type RemotePayload = Value;

/// Failures to obtain a payload from the remote system.
///
/// This is the closed list of failures a best-effort caller may absorb.
/// Business rejections are never represented here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("Communication failure: {0}")]
    Communication(String),

    #[error("Remote operation {operation} returned no content")]
    NoContent { operation: String },

    #[error("Unclassified remote failure: {0}")]
    Unclassified(String),
}

/// Interpretation of a delivered `(success, message, ..)` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Accepted { message: String },
    Rejected { message: String },
    /// Not an array, fewer than two elements, or a non-boolean flag.
    Malformed,
}

impl RemoteOutcome {
    pub fn interpret(payload: &RemotePayload) -> Self {
        let Value::Array(elements) = payload else {
            return RemoteOutcome::Malformed;
        };
        if elements.len() < 2 {
            return RemoteOutcome::Malformed;
        }
        let Some(success) = elements[0].as_bool() else {
            return RemoteOutcome::Malformed;
        };
        let message = match &elements[1] {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if success {
            RemoteOutcome::Accepted { message }
        } else {
            RemoteOutcome::Rejected { message }
        }
    }
}

/// Interface for calling an external system by operation name.
///
/// Retries, if any, are the implementation's concern.
///
/// Implementations:
/// - `HttpRemoteInvoker`: JSON over HTTP with backoff
/// - `MockRemoteInvoker`: Scripted replies for testing
#[async_trait]
pub trait RemoteInvoker: Send + Sync {
    async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<RemotePayload>;
}
