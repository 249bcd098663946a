//! Request handler chain links.

mod customer_sync;
mod mock;

pub use customer_sync::CustomerExtensionSync;
pub use mock::MockDataService;
