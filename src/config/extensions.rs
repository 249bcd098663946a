//! Extension property configuration.
//!
//! Names the extension keys, where their values live in the side tables,
//! and which procedure and remote operation persist them.

use serde::Deserialize;

/// Default maximum in-flight per-row lookups.
pub const DEFAULT_FANOUT: usize = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Schema of the side tables. `None` uses the connection default.
    /// SQLite accepts only `main` or `temp`.
    pub schema: Option<String>,
    /// Customer extension table, keyed by account number.
    pub table: String,
    /// Account number column of the extension table.
    pub key_column: String,
    /// Extension value column of the extension table.
    pub value_column: String,

    /// Procedure that upserts one customer's extension value.
    pub upsert_procedure: String,
    /// Procedure parameter carrying the account number.
    pub account_parameter: String,
    /// Remote operation that mirrors the value to the remote system.
    pub remote_operation: String,

    /// Key on customer entities (reads and create/update input).
    pub property_key: String,
    /// Key on customer search results.
    pub search_property_key: String,
    /// Key on the cached channel configuration.
    pub channel_property_key: String,

    /// Channel configuration parameter table.
    pub parameter_table: String,
    pub parameter_channel_column: String,
    pub parameter_name_column: String,
    pub parameter_value_column: String,

    /// Maximum in-flight per-row lookups when enriching a collection.
    pub fanout: usize,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            schema: None,
            table: "CONTOSOCUSTTABLEEXTENSION".to_string(),
            key_column: "ACCOUNTNUM".to_string(),
            value_column: "REFNOEXT".to_string(),
            upsert_procedure: "UPDATECUSTOMEREXTENEDPROPERTIES".to_string(),
            account_parameter: "AccountNum".to_string(),
            remote_operation: "UpdateCustomerExtendedProperties".to_string(),
            property_key: "REFNOEXT".to_string(),
            search_property_key: "RefNoExt".to_string(),
            channel_property_key: "ExtConfigurationParameters".to_string(),
            parameter_table: "RETAILCONFIGURATIONPARAMETERS".to_string(),
            parameter_channel_column: "CHANNEL".to_string(),
            parameter_name_column: "NAME".to_string(),
            parameter_value_column: "VALUE".to_string(),
            fanout: DEFAULT_FANOUT,
        }
    }
}

impl ExtensionConfig {
    /// Fan-out width, never below one.
    pub fn fanout(&self) -> usize {
        self.fanout.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fanout_clamps_to_one() {
        let config = ExtensionConfig {
            fanout: 0,
            ..ExtensionConfig::default()
        };
        assert_eq!(config.fanout(), 1);
    }
}
