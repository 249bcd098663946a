//! Mock storage implementations for testing.
//!
//! Also backs the `memory` storage type.

mod row_store;

pub use row_store::MockRowStore;
