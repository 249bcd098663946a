//! Side-table storage implementations.

use std::sync::Arc;

use tracing::info;
#[cfg(not(feature = "sqlite"))]
use tracing::error;

use crate::config::{Config, StorageType};
use crate::interfaces::RowStore;

pub mod mock;
pub mod procedure;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use crate::interfaces::row_store::Result;
pub use mock::MockRowStore;
pub use procedure::{customer_extension_procedure, ProcedureColumn, UpsertProcedure};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRowStore;

/// Initialize the side-table store based on configuration.
///
/// Tables are created if missing and the customer extension upsert is
/// registered under its configured procedure name.
pub async fn init_row_store(
    config: &Config,
) -> std::result::Result<Arc<dyn RowStore>, Box<dyn std::error::Error>> {
    let storage = &config.storage;
    let extensions = &config.extensions;
    let procedure = customer_extension_procedure(extensions);

    match storage.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            info!(path = %storage.path, "Storage: sqlite");

            let (url, max_connections) = if storage.path == ":memory:" {
                // Each in-memory connection is its own database.
                ("sqlite::memory:".to_string(), 1)
            } else {
                if let Some(parent) = std::path::Path::new(&storage.path).parent() {
                    std::fs::create_dir_all(parent)?;
                }
                (
                    format!("sqlite:{}?mode=rwc", storage.path),
                    storage.max_connections.max(1),
                )
            };

            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect(&url)
                .await?;

            let store =
                SqliteRowStore::new(pool).with_procedure(&extensions.upsert_procedure, procedure);
            store.init(extensions).await?;

            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => {
            error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err("SQLite feature not enabled".into())
        }
        StorageType::Memory => {
            info!("Storage: memory");
            Ok(Arc::new(
                MockRowStore::new().with_procedure(&extensions.upsert_procedure, procedure),
            ))
        }
    }
}
