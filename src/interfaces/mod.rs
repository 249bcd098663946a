//! Abstract interfaces for the enrichment core.
//!
//! These traits define the contracts for:
//! - Side-table access (row store)
//! - Remote system calls (remote invoker)
//! - Request handler chain links
//! - Post-execution triggers

pub mod handler;
pub mod remote_invoker;
pub mod row_store;
pub mod trigger;

pub use handler::{
    PipelineError, RequestHandler, INVALID_REMOTE_RESPONSE, REMOTE_UPDATE_REJECTED,
};
pub use remote_invoker::{RemoteError, RemoteInvoker, RemoteOutcome, RemotePayload};
pub use row_store::{Param, ParameterSet, Row, RowQuery, RowStore, StorageError};
pub use trigger::Trigger;
