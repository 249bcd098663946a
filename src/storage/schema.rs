//! Side-table schema definitions using sea-query.
//!
//! Table and column names come from [`ExtensionConfig`], so identifiers are
//! built with `Alias` rather than a fixed `Iden` enum.

use sea_query::{Alias, ColumnDef, Index, IntoTableRef, SqliteQueryBuilder, Table, TableRef};

use crate::config::ExtensionConfig;

/// Table reference, schema-qualified when a schema is configured.
pub fn table_ref(schema: Option<&str>, table: &str) -> TableRef {
    match schema {
        Some(schema) => (Alias::new(schema), Alias::new(table)).into_table_ref(),
        None => Alias::new(table).into_table_ref(),
    }
}

/// SQL for creating the customer extension table.
pub fn create_extension_table(config: &ExtensionConfig) -> String {
    Table::create()
        .table(table_ref(config.schema.as_deref(), &config.table))
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new(&config.key_column))
                .text()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Alias::new(&config.value_column)).text().null())
        .to_string(SqliteQueryBuilder)
}

/// SQL for creating the channel configuration parameter table.
pub fn create_parameter_table(config: &ExtensionConfig) -> String {
    Table::create()
        .table(table_ref(config.schema.as_deref(), &config.parameter_table))
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new(&config.parameter_channel_column))
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new(&config.parameter_name_column))
                .text()
                .not_null(),
        )
        .col(ColumnDef::new(Alias::new(&config.parameter_value_column)).text().null())
        .primary_key(
            Index::create()
                .col(Alias::new(&config.parameter_channel_column))
                .col(Alias::new(&config.parameter_name_column)),
        )
        .to_string(SqliteQueryBuilder)
}
