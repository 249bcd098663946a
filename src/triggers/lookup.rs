//! Side-table lookups shared by the triggers.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::config::ExtensionConfig;
use crate::interfaces::row_store::Result;
use crate::interfaces::{RowQuery, RowStore};
use crate::model::ConfigurationParameter;

/// Reads extension values and channel parameters from the side tables.
#[derive(Clone)]
pub struct ExtensionLookup {
    store: Arc<dyn RowStore>,
    config: ExtensionConfig,
}

impl ExtensionLookup {
    pub fn new(store: Arc<dyn RowStore>, config: ExtensionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Extension value for one account. A missing row and a NULL value both
    /// yield `None`.
    pub async fn fetch(&self, account_number: &str) -> Result<Option<String>> {
        let query = RowQuery::select(&self.config.table)
            .schema(self.config.schema.clone())
            .column(&self.config.value_column)
            .where_eq(&self.config.key_column, account_number);

        let value = self
            .store
            .query_one(&query)
            .await?
            .and_then(|row| row.get(&self.config.value_column).map(str::to_string));

        debug!(account = %account_number, found = value.is_some(), "Extension lookup");
        Ok(value)
    }

    /// One independent lookup per account, at most `fanout` in flight.
    ///
    /// Results keep the input order. The first failure is returned and no
    /// further lookups are started.
    pub async fn fetch_each(&self, account_numbers: Vec<String>) -> Result<Vec<Option<String>>> {
        stream::iter(account_numbers)
            .map(|account| async move { self.fetch(&account).await })
            .buffered(self.config.fanout())
            .try_collect()
            .await
    }

    /// Configuration parameters of one channel, possibly none.
    pub async fn channel_parameters(&self, channel_id: i64) -> Result<Vec<ConfigurationParameter>> {
        let query = RowQuery::select(&self.config.parameter_table)
            .schema(self.config.schema.clone())
            .column(&self.config.parameter_name_column)
            .column(&self.config.parameter_value_column)
            .where_eq(&self.config.parameter_channel_column, channel_id);

        let parameters: Vec<_> = self
            .store
            .query(&query)
            .await?
            .into_iter()
            .filter_map(|row| {
                let name = row.get(&self.config.parameter_name_column)?.to_string();
                let value = row
                    .get(&self.config.parameter_value_column)
                    .unwrap_or_default()
                    .to_string();
                Some(ConfigurationParameter { name, value })
            })
            .collect();

        debug!(channel = channel_id, count = parameters.len(), "Channel parameter lookup");
        Ok(parameters)
    }
}
