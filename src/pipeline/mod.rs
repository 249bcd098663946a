//! Reference dispatcher.
//!
//! Runs one request through the handler chain, then through every trigger
//! registered for its kind:
//!
//! 1. `before_execute` on each matching trigger, in registration order
//! 2. the handler chain
//! 3. `after_execute` on each matching trigger, in registration order
//!
//! The first error stops the run and is returned unmodified.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::config::ExtensionConfig;
use crate::handlers::CustomerExtensionSync;
use crate::interfaces::handler::Result;
use crate::interfaces::{RemoteInvoker, RequestHandler, RowStore, Trigger};
use crate::model::{Request, Response};
use crate::triggers::{ChannelDataTrigger, CustomerExtensionTrigger, ExtensionLookup};

/// Handler chain plus its registered triggers.
pub struct Pipeline {
    handler: Arc<dyn RequestHandler>,
    triggers: RwLock<Vec<Arc<dyn Trigger>>>,
}

impl Pipeline {
    pub fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            handler,
            triggers: RwLock::new(Vec::new()),
        }
    }

    /// Standard wiring: `data_service` wrapped by [`CustomerExtensionSync`],
    /// with the channel data and customer extension triggers registered.
    pub async fn assemble(
        data_service: Arc<dyn RequestHandler>,
        store: Arc<dyn RowStore>,
        remote: Arc<dyn RemoteInvoker>,
        config: &ExtensionConfig,
    ) -> Self {
        let lookup = ExtensionLookup::new(store.clone(), config.clone());
        let chain = CustomerExtensionSync::new(data_service, store, remote, config);

        let pipeline = Self::new(Arc::new(chain));
        pipeline
            .register(Arc::new(ChannelDataTrigger::new(lookup.clone())))
            .await;
        pipeline
            .register(Arc::new(CustomerExtensionTrigger::new(lookup)))
            .await;
        pipeline
    }

    /// Register a trigger. Later registrations run after earlier ones.
    pub async fn register(&self, trigger: Arc<dyn Trigger>) {
        debug!(trigger = %trigger.name(), kinds = ?trigger.supported_kinds(), "Trigger registered");
        self.triggers.write().await.push(trigger);
    }

    pub async fn trigger_count(&self) -> usize {
        self.triggers.read().await.len()
    }

    /// Execute `request` and return the enriched response.
    pub async fn execute(&self, request: &Request) -> Result<Response> {
        let kind = request.kind();
        let triggers: Vec<Arc<dyn Trigger>> = self
            .triggers
            .read()
            .await
            .iter()
            .filter(|t| t.handles(kind))
            .cloned()
            .collect();

        for trigger in &triggers {
            trigger.before_execute(request).await?;
        }

        let mut response = self.handler.process(request).await?;

        for trigger in &triggers {
            if let Err(e) = trigger.after_execute(request, &mut response).await {
                error!(trigger = %trigger.name(), kind = %kind, error = %e, "Trigger failed");
                return Err(e);
            }
            debug!(trigger = %trigger.name(), kind = %kind, "Trigger completed");
        }

        Ok(response)
    }
}
