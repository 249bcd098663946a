//! Commerce enrichment - pipeline interception and idempotent cache enrichment
//!
//! Extension points for a host commerce pipeline: a handler chain link that
//! persists a customer's extension value locally and mirrors it to a remote
//! system, and post-execution triggers that enrich responses from side
//! tables, including a process-wide cached entity shared by concurrent
//! requests.

pub mod config;
pub mod guard;
pub mod handlers;
pub mod interfaces;
pub mod model;
pub mod pipeline;
pub mod remote;
pub mod storage;
pub mod triggers;
pub mod utils;

pub use config::Config;
pub use guard::{enrich_once, EnrichOutcome};
pub use interfaces::{PipelineError, RequestHandler, Trigger};
pub use model::{Request, RequestKind, Response};
pub use pipeline::Pipeline;
