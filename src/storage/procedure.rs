//! Named side-table procedures.
//!
//! The host calls side-table writes by procedure name. Each name maps to an
//! upsert over one table: key columns identify the row, value columns are
//! overwritten on conflict. Every column is fed by a named parameter.

use crate::config::ExtensionConfig;
use crate::interfaces::{Param, ParameterSet, StorageError};

use super::Result;

/// One column of an upsert and the parameter that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureColumn {
    pub column: String,
    pub parameter: String,
}

/// Upsert procedure definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertProcedure {
    pub schema: Option<String>,
    pub table: String,
    pub keys: Vec<ProcedureColumn>,
    pub values: Vec<ProcedureColumn>,
}

impl UpsertProcedure {
    pub fn new(schema: Option<String>, table: impl Into<String>) -> Self {
        Self {
            schema,
            table: table.into(),
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn key(mut self, column: impl Into<String>, parameter: impl Into<String>) -> Self {
        self.keys.push(ProcedureColumn {
            column: column.into(),
            parameter: parameter.into(),
        });
        self
    }

    pub fn value(mut self, column: impl Into<String>, parameter: impl Into<String>) -> Self {
        self.values.push(ProcedureColumn {
            column: column.into(),
            parameter: parameter.into(),
        });
        self
    }

    /// Resolve every column's parameter, keys first.
    pub fn bind(&self, procedure: &str, params: &ParameterSet) -> Result<Vec<(String, Param)>> {
        self.keys
            .iter()
            .chain(self.values.iter())
            .map(|c| {
                params
                    .get(&c.parameter)
                    .map(|p| (c.column.clone(), p.clone()))
                    .ok_or_else(|| StorageError::MissingParameter {
                        procedure: procedure.to_string(),
                        parameter: c.parameter.clone(),
                    })
            })
            .collect()
    }
}

/// Procedure names are matched ignoring ASCII case and `[ ]` quoting.
pub fn procedure_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// The customer extension upsert described by `config`.
pub fn customer_extension_procedure(config: &ExtensionConfig) -> UpsertProcedure {
    UpsertProcedure::new(config.schema.clone(), config.table.clone())
        .key(config.key_column.clone(), config.account_parameter.clone())
        .value(config.value_column.clone(), config.property_key.clone())
}
