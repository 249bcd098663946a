//! Post-execution trigger interface.

use async_trait::async_trait;

use super::handler::Result;
use crate::model::{Request, RequestKind, Response};

/// A post-processing hook bound to one or more request kinds.
///
/// Triggers hold no per-request state. `after_execute` enriches the response
/// the handler chain produced, in place.
///
/// Each trigger decides what an unexpected request kind means and documents
/// it: a trigger over a closed set fails with
/// [`PipelineError::Unsupported`](super::PipelineError::Unsupported), a
/// trigger meant to be registered broadly ignores it.
///
/// Triggers registered for the same kind run in registration order. At most
/// one trigger should write a given property key; this is not enforced.
#[async_trait]
pub trait Trigger: Send + Sync {
    /// Name of this trigger.
    fn name(&self) -> &str;

    /// Request kinds this trigger is registered for.
    fn supported_kinds(&self) -> &[RequestKind];

    /// Whether the dispatcher should fire this trigger for `kind`.
    fn handles(&self, kind: RequestKind) -> bool {
        self.supported_kinds().contains(&kind)
    }

    /// Runs before the request executes.
    async fn before_execute(&self, _request: &Request) -> Result<()> {
        Ok(())
    }

    /// Runs after the request executes, with the produced response.
    async fn after_execute(&self, request: &Request, response: &mut Response) -> Result<()>;
}
