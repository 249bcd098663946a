//! Bootstrap utilities for embedding the enrichment core.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LOG_ENV_VAR};
use crate::interfaces::RequestHandler;
use crate::pipeline::Pipeline;
use crate::remote::init_remote_invoker;
use crate::storage::init_row_store;

/// Initialize tracing with the ENRICH_LOG environment variable.
///
/// Defaults to "info" level if ENRICH_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the configured pipeline around the host's data service.
///
/// Opens the side-table store, builds the HTTP remote invoker, and wires
/// both triggers. Fails if storage cannot be opened or no remote endpoint
/// is configured.
pub async fn build_pipeline(
    config: &Config,
    data_service: Arc<dyn RequestHandler>,
) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let store = init_row_store(config).await?;
    let remote = init_remote_invoker(&config.remote)?;

    let pipeline = Pipeline::assemble(data_service, store, remote, &config.extensions).await;
    info!(
        storage = ?config.storage.storage_type,
        remote = config.remote.endpoint.as_deref().unwrap_or_default(),
        "Enrichment pipeline ready"
    );
    Ok(pipeline)
}
