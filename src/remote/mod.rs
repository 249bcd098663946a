//! Remote invoker implementations.

use std::sync::Arc;

use tracing::info;

use crate::config::RemoteConfig;
use crate::interfaces::RemoteInvoker;

mod http;
mod mock;

pub use http::{HttpInvokerError, HttpRemoteInvoker};
pub use mock::{MockRemoteInvoker, RecordedCall};

/// Initialize the remote invoker from configuration.
pub fn init_remote_invoker(
    config: &RemoteConfig,
) -> Result<Arc<dyn RemoteInvoker>, HttpInvokerError> {
    let invoker = HttpRemoteInvoker::new(config)?;
    info!(endpoint = %invoker.endpoint(), "Remote invoker: http");
    Ok(Arc::new(invoker))
}
