//! SQLite implementations of storage interfaces.

mod row_store;

pub use row_store::SqliteRowStore;
