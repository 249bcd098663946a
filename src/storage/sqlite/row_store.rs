//! SQLite RowStore implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_query::{Alias, Expr, Func, OnConflict, Query, SimpleExpr, SqliteQueryBuilder};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::{Row as _, SqlitePool};
use tracing::debug;

use crate::config::ExtensionConfig;
use crate::interfaces::{ParameterSet, Row, RowQuery, RowStore, StorageError};
use crate::storage::procedure::{procedure_key, UpsertProcedure};
use crate::storage::schema::{self, table_ref};
use crate::storage::Result;

/// SQLite implementation of RowStore.
///
/// Selected columns are cast to TEXT so every cell decodes as an optional
/// string regardless of its declared affinity.
pub struct SqliteRowStore {
    pool: SqlitePool,
    procedures: HashMap<String, UpsertProcedure>,
}

impl SqliteRowStore {
    /// Create a new SQLite row store.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            procedures: HashMap::new(),
        }
    }

    /// Register a named upsert procedure.
    pub fn with_procedure(mut self, name: &str, procedure: UpsertProcedure) -> Self {
        self.procedures.insert(procedure_key(name), procedure);
        self
    }

    /// Create the side tables described by `config` if they do not exist.
    ///
    /// SQLite only knows the `main` and `temp` schemas on a fresh connection;
    /// any other configured schema is rejected before touching the database.
    pub async fn init(&self, config: &ExtensionConfig) -> Result<()> {
        Self::check_schema(config.schema.as_deref())?;

        let mut conn = self.pool.acquire().await?;
        sqlx::query(&schema::create_extension_table(config))
            .execute(&mut *conn)
            .await?;
        sqlx::query(&schema::create_parameter_table(config))
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    fn check_schema(schema: Option<&str>) -> Result<()> {
        match schema {
            None => Ok(()),
            Some(s) if s.eq_ignore_ascii_case("main") || s.eq_ignore_ascii_case("temp") => Ok(()),
            Some(s) => Err(StorageError::InvalidQuery(format!(
                "schema '{}' is not available on SQLite; unset extensions.schema or use 'main'",
                s
            ))),
        }
    }

    fn build_select(query: &RowQuery) -> Result<(String, SqlxValues)> {
        if query.columns.is_empty() {
            return Err(StorageError::InvalidQuery(format!(
                "no columns selected from {}",
                query.table
            )));
        }

        let mut stmt = Query::select();
        for column in &query.columns {
            stmt.expr_as(
                Func::cast_as(Expr::col(Alias::new(column)), Alias::new("TEXT")),
                Alias::new(column),
            );
        }
        stmt.from(table_ref(query.schema.as_deref(), &query.table));
        for (column, value) in query.filters.iter() {
            stmt.and_where(Expr::col(Alias::new(column)).eq(sea_query::Value::from(value)));
        }
        if let Some(limit) = query.limit {
            stmt.limit(limit);
        }

        Ok(stmt.build_sqlx(SqliteQueryBuilder))
    }

    fn build_upsert(
        name: &str,
        procedure: &UpsertProcedure,
        params: &ParameterSet,
    ) -> Result<(String, SqlxValues)> {
        let bound = procedure.bind(name, params)?;

        let mut on_conflict =
            OnConflict::columns(procedure.keys.iter().map(|k| Alias::new(&k.column)));
        if procedure.values.is_empty() {
            on_conflict.do_nothing();
        } else {
            on_conflict.update_columns(procedure.values.iter().map(|v| Alias::new(&v.column)));
        }

        let mut stmt = Query::insert();
        stmt.into_table(table_ref(procedure.schema.as_deref(), &procedure.table))
            .columns(bound.iter().map(|(column, _)| Alias::new(column)))
            .values(
                bound
                    .iter()
                    .map(|(_, value)| SimpleExpr::from(sea_query::Value::from(value))),
            )?
            .on_conflict(on_conflict);

        Ok(stmt.build_sqlx(SqliteQueryBuilder))
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn query(&self, query: &RowQuery) -> Result<Vec<Row>> {
        let (sql, values) = Self::build_select(query)?;

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_with(&sql, values).fetch_all(&mut *conn).await?;

        debug!(table = %query.table, rows = rows.len(), "Side-table query");

        rows.iter()
            .map(|row| -> Result<Row> {
                let mut out = Row::new();
                for (index, column) in query.columns.iter().enumerate() {
                    let value: Option<String> = row.try_get(index)?;
                    out.push(column.clone(), value);
                }
                Ok(out)
            })
            .collect()
    }

    async fn execute_non_query(&self, procedure: &str, params: &ParameterSet) -> Result<()> {
        let definition = self
            .procedures
            .get(&procedure_key(procedure))
            .ok_or_else(|| StorageError::UnknownProcedure(procedure.to_string()))?;

        let (sql, values) = Self::build_upsert(procedure, definition, params)?;

        let mut conn = self.pool.acquire().await?;
        sqlx::query_with(&sql, values).execute(&mut *conn).await?;

        debug!(procedure = %procedure, table = %definition.table, "Side-table upsert");
        Ok(())
    }
}
