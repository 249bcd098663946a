//! Mock RowStore implementation for testing.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::{ParameterSet, Row, RowQuery, RowStore, StorageError};
use crate::storage::procedure::{procedure_key, UpsertProcedure};
use crate::storage::Result;

fn table_key(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", schema, table).to_ascii_lowercase(),
        None => table.to_ascii_lowercase(),
    }
}

/// Mock row store that keeps side tables in memory.
///
/// Records every query and procedure call, and can be told to fail lookups
/// for specific filter values or to fail every procedure call.
#[derive(Default)]
pub struct MockRowStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    procedures: HashMap<String, UpsertProcedure>,
    queries: RwLock<Vec<RowQuery>>,
    executions: RwLock<Vec<(String, ParameterSet)>>,
    failing_lookups: RwLock<HashSet<String>>,
    fail_on_execute: RwLock<bool>,
}

impl MockRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named upsert procedure.
    pub fn with_procedure(mut self, name: &str, procedure: UpsertProcedure) -> Self {
        self.procedures.insert(procedure_key(name), procedure);
        self
    }

    pub async fn insert_row(&self, schema: Option<&str>, table: &str, row: Row) {
        self.tables
            .write()
            .await
            .entry(table_key(schema, table))
            .or_default()
            .push(row);
    }

    pub async fn rows(&self, schema: Option<&str>, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(&table_key(schema, table))
            .cloned()
            .unwrap_or_default()
    }

    /// Fail any lookup filtered on `value`.
    pub async fn fail_lookups_for(&self, value: impl Into<String>) {
        self.failing_lookups.write().await.insert(value.into());
    }

    pub async fn set_fail_on_execute(&self, fail: bool) {
        *self.fail_on_execute.write().await = fail;
    }

    pub async fn queries(&self) -> Vec<RowQuery> {
        self.queries.read().await.clone()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    pub async fn executions(&self) -> Vec<(String, ParameterSet)> {
        self.executions.read().await.clone()
    }

    fn matches(row: &Row, filters: &ParameterSet) -> bool {
        filters
            .iter()
            .all(|(column, value)| row.get(column) == Some(value.to_text().as_str()))
    }
}

#[async_trait]
impl RowStore for MockRowStore {
    async fn query(&self, query: &RowQuery) -> Result<Vec<Row>> {
        self.queries.write().await.push(query.clone());

        {
            let failing = self.failing_lookups.read().await;
            if let Some((_, value)) = query
                .filters
                .iter()
                .find(|(_, value)| failing.contains(&value.to_text()))
            {
                return Err(StorageError::Unavailable(format!(
                    "lookup failed for {}",
                    value.to_text()
                )));
            }
        }

        let tables = self.tables.read().await;
        let rows = tables
            .get(&table_key(query.schema.as_deref(), &query.table))
            .map(|rows| {
                rows.iter()
                    .filter(|row| Self::matches(row, &query.filters))
                    .map(|row| row.project(&query.columns))
                    .take(query.limit.map_or(usize::MAX, |l| l as usize))
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn execute_non_query(&self, procedure: &str, params: &ParameterSet) -> Result<()> {
        self.executions
            .write()
            .await
            .push((procedure.to_string(), params.clone()));

        if *self.fail_on_execute.read().await {
            return Err(StorageError::Unavailable(format!(
                "procedure {} failed",
                procedure
            )));
        }

        let definition = self
            .procedures
            .get(&procedure_key(procedure))
            .ok_or_else(|| StorageError::UnknownProcedure(procedure.to_string()))?;
        let bound = definition.bind(procedure, params)?;
        let key_count = definition.keys.len();

        let mut tables = self.tables.write().await;
        let rows = tables
            .entry(table_key(definition.schema.as_deref(), &definition.table))
            .or_default();

        let existing = rows.iter_mut().find(|row| {
            bound[..key_count]
                .iter()
                .all(|(column, value)| row.get(column) == Some(value.to_text().as_str()))
        });

        match existing {
            Some(row) => {
                for (column, value) in &bound[key_count..] {
                    row.set(column, Some(value.to_text()));
                }
            }
            None => {
                let mut row = Row::new();
                for (column, value) in bound {
                    row.push(column, Some(value.to_text()));
                }
                rows.push(row);
            }
        }
        Ok(())
    }
}
