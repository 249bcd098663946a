//! RowStore interface tests.
//!
//! These tests verify the contract of the RowStore trait. The store under
//! test must have the customer extension table created and the upsert
//! registered under its default procedure name.

use commerce_enrichment::config::ExtensionConfig;
use commerce_enrichment::interfaces::{ParameterSet, RowQuery, RowStore, StorageError};

fn config() -> ExtensionConfig {
    ExtensionConfig::default()
}

/// Lookup of the extension value for one account.
pub fn lookup(account: &str) -> RowQuery {
    let config = config();
    RowQuery::select(&config.table)
        .column(&config.value_column)
        .where_eq(&config.key_column, account)
}

/// Parameters for the customer extension upsert.
pub fn upsert_params(account: &str, value: &str) -> ParameterSet {
    ParameterSet::new()
        .with("AccountNum", account)
        .with("REFNOEXT", value)
}

async fn upsert<S: RowStore>(store: &S, params: &ParameterSet) {
    store
        .execute_non_query(&config().upsert_procedure, params)
        .await
        .expect("upsert should succeed");
}

// =============================================================================
// RowStore::query tests
// =============================================================================

pub async fn test_query_missing_row<S: RowStore>(store: &S) {
    let rows = store
        .query(&lookup("test_missing"))
        .await
        .expect("query should succeed");
    assert!(rows.is_empty(), "missing row should yield no rows");

    let row = store
        .query_one(&lookup("test_missing"))
        .await
        .expect("query_one should succeed");
    assert!(row.is_none());
}

// =============================================================================
// RowStore::execute_non_query tests
// =============================================================================

pub async fn test_upsert_then_query<S: RowStore>(store: &S) {
    upsert(store, &upsert_params("test_insert", "ABC123")).await;

    let row = store
        .query_one(&lookup("test_insert"))
        .await
        .expect("query_one should succeed")
        .expect("row should exist");
    assert_eq!(row.get("REFNOEXT"), Some("ABC123"));
}

pub async fn test_upsert_overwrites<S: RowStore>(store: &S) {
    upsert(store, &upsert_params("test_overwrite", "first")).await;
    upsert(store, &upsert_params("test_overwrite", "second")).await;

    let rows = store
        .query(&lookup("test_overwrite"))
        .await
        .expect("query should succeed");
    assert_eq!(rows.len(), 1, "upsert should not duplicate the row");
    assert_eq!(rows[0].get("REFNOEXT"), Some("second"));
}

pub async fn test_upsert_accepts_marked_parameters<S: RowStore>(store: &S) {
    let params = ParameterSet::new()
        .with("@ACCOUNTNUM", "test_marked")
        .with("@refnoext", "marked");
    upsert(store, &params).await;

    let row = store
        .query_one(&lookup("test_marked"))
        .await
        .expect("query_one should succeed")
        .expect("row should exist");
    assert_eq!(row.get("refnoext"), Some("marked"));
}

pub async fn test_upsert_empty_value<S: RowStore>(store: &S) {
    upsert(store, &upsert_params("test_empty", "")).await;

    let row = store
        .query_one(&lookup("test_empty"))
        .await
        .expect("query_one should succeed")
        .expect("row should exist");
    assert_eq!(row.get("REFNOEXT"), Some(""));
}

pub async fn test_unknown_procedure<S: RowStore>(store: &S) {
    let err = store
        .execute_non_query("test_no_such_procedure", &upsert_params("test_x", "x"))
        .await
        .expect_err("unknown procedure should fail");
    assert!(matches!(err, StorageError::UnknownProcedure(_)));
}

pub async fn test_missing_parameter<S: RowStore>(store: &S) {
    let params = ParameterSet::new().with("AccountNum", "test_partial");
    let err = store
        .execute_non_query(&config().upsert_procedure, &params)
        .await
        .expect_err("missing parameter should fail");
    assert!(matches!(err, StorageError::MissingParameter { .. }));

    let rows = store
        .query(&lookup("test_partial"))
        .await
        .expect("query should succeed");
    assert!(rows.is_empty(), "failed upsert must write nothing");
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all RowStore interface tests against a store implementation.
#[macro_export]
macro_rules! run_row_store_tests {
    ($store:expr) => {
        use $crate::storage::row_store_tests::*;

        test_query_missing_row($store).await;
        println!("  test_query_missing_row: PASSED");

        test_upsert_then_query($store).await;
        println!("  test_upsert_then_query: PASSED");

        test_upsert_overwrites($store).await;
        println!("  test_upsert_overwrites: PASSED");

        test_upsert_accepts_marked_parameters($store).await;
        println!("  test_upsert_accepts_marked_parameters: PASSED");

        test_upsert_empty_value($store).await;
        println!("  test_upsert_empty_value: PASSED");

        test_unknown_procedure($store).await;
        println!("  test_unknown_procedure: PASSED");

        test_missing_parameter($store).await;
        println!("  test_missing_parameter: PASSED");
    };
}
