use serde_json::{json, Value};

use super::*;
use crate::handlers::MockDataService;
use crate::interfaces::{Param, StorageError};
use crate::model::RequestKind;
use crate::remote::MockRemoteInvoker;
use crate::storage::{customer_extension_procedure, MockRowStore};

struct Fixture {
    data: Arc<MockDataService>,
    store: Arc<MockRowStore>,
    remote: Arc<MockRemoteInvoker>,
    sync: CustomerExtensionSync,
}

async fn fixture() -> Fixture {
    let config = ExtensionConfig::default();
    let data = Arc::new(MockDataService::new());
    data.respond(
        RequestKind::CreateOrUpdateCustomer,
        Response::Customer(Some(Customer::new("C0001", "Ada (saved)"))),
    )
    .await;
    let store = Arc::new(
        MockRowStore::new()
            .with_procedure(&config.upsert_procedure, customer_extension_procedure(&config)),
    );
    let remote = Arc::new(MockRemoteInvoker::new());
    let sync = CustomerExtensionSync::new(data.clone(), store.clone(), remote.clone(), &config);
    Fixture {
        data,
        store,
        remote,
        sync,
    }
}

fn upsert_request(value: Option<&str>) -> Request {
    let mut customer = Customer::new("C0001", "Ada");
    if let Some(value) = value {
        customer.properties.set("REFNOEXT", value);
    }
    Request::CreateOrUpdateCustomer { customer }
}

fn stage_one_response() -> Response {
    Response::Customer(Some(Customer::new("C0001", "Ada (saved)")))
}

#[tokio::test]
async fn test_accepted_update_returns_delegate_response() {
    let f = fixture().await;
    f.remote.push_outcome(true, "ok").await;

    let response = f.sync.process(&upsert_request(Some("ABC123"))).await.unwrap();
    assert_eq!(response, stage_one_response());

    let executions = f.store.executions().await;
    assert_eq!(executions.len(), 1);
    let (procedure, params) = &executions[0];
    assert_eq!(procedure, "UPDATECUSTOMEREXTENEDPROPERTIES");
    assert_eq!(params.get("AccountNum"), Some(&Param::from("C0001")));
    assert_eq!(params.get("REFNOEXT"), Some(&Param::from("ABC123")));

    let calls = f.remote.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operation, "UpdateCustomerExtendedProperties");
    assert_eq!(calls[0].args, vec![json!("C0001"), json!("ABC123")]);
}

#[tokio::test]
async fn test_communication_failure_is_absorbed() {
    let f = fixture().await;
    f.remote
        .push_reply(Err(RemoteError::Communication("connection reset".to_string())))
        .await;

    let response = f.sync.process(&upsert_request(Some("ABC123"))).await.unwrap();
    assert_eq!(response, stage_one_response());
    assert_eq!(f.store.rows(None, "CONTOSOCUSTTABLEEXTENSION").await.len(), 1);
}

#[tokio::test]
async fn test_no_content_and_unclassified_are_absorbed() {
    let f = fixture().await;
    f.remote
        .push_reply(Err(RemoteError::NoContent {
            operation: "UpdateCustomerExtendedProperties".to_string(),
        }))
        .await;
    f.remote
        .push_reply(Err(RemoteError::Unclassified("HTTP 400".to_string())))
        .await;

    assert!(f.sync.process(&upsert_request(Some("A"))).await.is_ok());
    assert!(f.sync.process(&upsert_request(Some("B"))).await.is_ok());
}

#[tokio::test]
async fn test_rejection_is_business_error() {
    let f = fixture().await;
    f.remote.push_outcome(false, "quota exceeded").await;

    let err = f
        .sync
        .process(&upsert_request(Some("ABC123")))
        .await
        .unwrap_err();

    match err {
        PipelineError::Business { code, message } => {
            assert_eq!(code, REMOTE_UPDATE_REJECTED);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected business error, got {other:?}"),
    }
    // The local write is not undone.
    assert_eq!(f.store.rows(None, "CONTOSOCUSTTABLEEXTENSION").await.len(), 1);
}

#[tokio::test]
async fn test_single_element_reply_is_invalid_response() {
    let f = fixture().await;
    f.remote.push_reply(Ok(json!([true]))).await;

    let err = f
        .sync
        .process(&upsert_request(Some("ABC123")))
        .await
        .unwrap_err();

    match err {
        PipelineError::Business { code, message } => {
            assert_eq!(code, INVALID_REMOTE_RESPONSE);
            assert_eq!(message, "invalid remote response");
        }
        other => panic!("expected business error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_null_reply_is_invalid_response() {
    let f = fixture().await;
    f.remote.push_reply(Ok(Value::Null)).await;

    let err = f.sync.process(&upsert_request(None)).await.unwrap_err();
    assert!(err.is_business());
}

#[tokio::test]
async fn test_missing_value_persists_empty_string() {
    let f = fixture().await;
    let mut customer = Customer::new("C0001", "Ada");
    customer.properties.set("RefNoExt", "mixed-case");
    let request = Request::CreateOrUpdateCustomer { customer };

    f.sync.process(&request).await.unwrap();
    f.sync.process(&upsert_request(None)).await.unwrap();

    let executions = f.store.executions().await;
    assert_eq!(executions[0].1.get("REFNOEXT"), Some(&Param::from("mixed-case")));
    assert_eq!(executions[1].1.get("REFNOEXT"), Some(&Param::from("")));
    assert_eq!(f.remote.calls().await[1].args, vec![json!("C0001"), json!("")]);
}

#[tokio::test]
async fn test_local_failure_skips_remote() {
    let f = fixture().await;
    f.store.set_fail_on_execute(true).await;

    let err = f
        .sync
        .process(&upsert_request(Some("ABC123")))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::DataAccess(StorageError::Unavailable(_))));
    assert_eq!(f.remote.call_count().await, 0);
}

#[tokio::test]
async fn test_delegate_failure_propagates_before_side_effects() {
    let f = fixture().await;
    f.data.set_fail_on_process(true).await;

    let err = f
        .sync
        .process(&upsert_request(Some("ABC123")))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::DataAccess(_)));
    assert!(f.store.executions().await.is_empty());
    assert_eq!(f.remote.call_count().await, 0);
}

#[tokio::test]
async fn test_empty_account_is_validation_error() {
    let f = fixture().await;
    let request = Request::CreateOrUpdateCustomer {
        customer: Customer::new("", "Nobody"),
    };

    let err = f.sync.process(&request).await.unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert_eq!(f.data.request_count().await, 0);
}

#[tokio::test]
async fn test_other_requests_pass_through() {
    let f = fixture().await;
    let request = Request::GetCustomer {
        account_number: "C0001".to_string(),
    };

    let response = f.sync.process(&request).await.unwrap();
    assert_eq!(response, Response::Empty);
    assert_eq!(f.data.requests().await, vec![request]);
    assert!(f.store.executions().await.is_empty());
    assert_eq!(f.remote.call_count().await, 0);
}

#[tokio::test]
async fn test_repeated_request_is_idempotent() {
    let f = fixture().await;
    let request = upsert_request(Some("ABC123"));

    f.sync.process(&request).await.unwrap();
    let rows_after_first = f.store.rows(None, "CONTOSOCUSTTABLEEXTENSION").await;
    f.sync.process(&request).await.unwrap();
    let rows_after_second = f.store.rows(None, "CONTOSOCUSTTABLEEXTENSION").await;

    assert_eq!(rows_after_first, rows_after_second);
    let calls = f.remote.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}
