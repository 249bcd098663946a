//! Request handler interface and pipeline errors.

use async_trait::async_trait;

use super::row_store::StorageError;
use crate::model::{Request, RequestKind, Response};

/// Result type for handler and trigger operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Business error code: the remote system rejected the update.
pub const REMOTE_UPDATE_REJECTED: &str = "UpdateCustomerExtendedPropertiesFailed";

/// Business error code: the remote system returned a broken payload.
pub const INVALID_REMOTE_RESPONSE: &str = "InvalidRemoteResponse";

/// Errors surfaced to the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Data access failed: {0}")]
    DataAccess(#[from] StorageError),

    #[error("Business error {code}: {message}")]
    Business { code: String, message: String },

    #[error("Request '{kind}' is not supported")]
    Unsupported { kind: RequestKind },
}

impl PipelineError {
    pub fn business(code: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Business {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_business(&self) -> bool {
        matches!(self, PipelineError::Business { .. })
    }
}

/// A link in the request handler chain.
///
/// Links are composed at registration time: a link that wraps another holds
/// it and calls its `process` as "next". The innermost handler is the host's
/// own data service.
///
/// # Example
///
/// ```ignore
/// let data_service: Arc<dyn RequestHandler> = host.data_service();
/// let chain = CustomerExtensionSync::new(data_service, store, remote, &config.extensions);
/// let response = chain.process(&request).await?;
/// ```
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Name of this handler, for logging.
    fn name(&self) -> &str;

    /// Process a request and produce its response.
    async fn process(&self, request: &Request) -> Result<Response>;
}
