//! Local-then-remote customer extension sync.
//!
//! Wraps the handler that executes `CreateOrUpdateCustomer`. After the
//! wrapped handler succeeds, the request's extension value is upserted into
//! the side table, then mirrored to the remote system on a best-effort basis.
//!
//! Stages, in order, never revisited:
//! 1. Delegate to the next handler. Failures propagate unchanged.
//! 2. Upsert the value locally. Failures propagate; the remote call is skipped.
//! 3. Invoke the remote operation. A rejection or a malformed reply is a
//!    business error and propagates. [`RemoteError`]s are logged and absorbed.
//!
//! The response returned is always the one produced in stage 1.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::ExtensionConfig;
use crate::interfaces::handler::Result;
use crate::interfaces::{
    ParameterSet, PipelineError, RemoteError, RemoteInvoker, RemoteOutcome, RequestHandler,
    RowStore, INVALID_REMOTE_RESPONSE, REMOTE_UPDATE_REJECTED,
};
use crate::model::{Customer, PropertyValue, Request, Response};

/// Handler chain link persisting a customer's extension value.
///
/// Requests other than `CreateOrUpdateCustomer` pass straight through.
pub struct CustomerExtensionSync {
    next: Arc<dyn RequestHandler>,
    store: Arc<dyn RowStore>,
    remote: Arc<dyn RemoteInvoker>,
    config: ExtensionConfig,
}

impl CustomerExtensionSync {
    pub fn new(
        next: Arc<dyn RequestHandler>,
        store: Arc<dyn RowStore>,
        remote: Arc<dyn RemoteInvoker>,
        config: &ExtensionConfig,
    ) -> Self {
        Self {
            next,
            store,
            remote,
            config: config.clone(),
        }
    }

    /// Extension value carried by the request. Key match ignores case; an
    /// absent or non-string value is empty.
    fn extension_value<'a>(&self, customer: &'a Customer) -> &'a str {
        customer
            .properties
            .get_ignore_case(&self.config.property_key)
            .and_then(PropertyValue::as_str)
            .unwrap_or("")
    }

    async fn persist_locally(&self, account: &str, value: &str) -> Result<()> {
        let params = ParameterSet::new()
            .with(self.config.account_parameter.as_str(), account)
            .with(self.config.property_key.as_str(), value);

        self.store
            .execute_non_query(&self.config.upsert_procedure, &params)
            .await?;

        info!(account = %account, key = %self.config.property_key, "Extension value persisted");
        Ok(())
    }

    async fn sync_remote(&self, account: &str, value: &str) -> Result<()> {
        let operation = &self.config.remote_operation;
        let reply = self
            .remote
            .invoke(operation, vec![json!(account), json!(value)])
            .await;

        let payload = match reply {
            Ok(payload) => payload,
            Err(e) => {
                Self::absorb(account, operation, &e);
                return Ok(());
            }
        };

        match RemoteOutcome::interpret(&payload) {
            RemoteOutcome::Accepted { message } => {
                debug!(account = %account, message = %message, "Remote update accepted");
                Ok(())
            }
            RemoteOutcome::Rejected { message } => {
                Err(PipelineError::business(REMOTE_UPDATE_REJECTED, message))
            }
            RemoteOutcome::Malformed => Err(PipelineError::business(
                INVALID_REMOTE_RESPONSE,
                "invalid remote response",
            )),
        }
    }

    fn absorb(account: &str, operation: &str, error: &RemoteError) {
        warn!(
            account = %account,
            operation = %operation,
            error = %error,
            "Remote update failed, local value kept"
        );
    }
}

#[async_trait]
impl RequestHandler for CustomerExtensionSync {
    fn name(&self) -> &str {
        "customer-extension-sync"
    }

    async fn process(&self, request: &Request) -> Result<Response> {
        let Request::CreateOrUpdateCustomer { customer } = request else {
            return self.next.process(request).await;
        };

        let account = customer.account_number.as_str();
        if account.is_empty() {
            return Err(PipelineError::Validation(
                "customer account number is required".to_string(),
            ));
        }

        let response = self.next.process(request).await?;

        let value = self.extension_value(customer);
        self.persist_locally(account, value).await?;
        self.sync_remote(account, value).await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests;
