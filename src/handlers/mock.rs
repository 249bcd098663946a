//! Mock data service for testing.
//!
//! Stands in for the host's own handler at the end of a chain.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::handler::Result;
use crate::interfaces::{PipelineError, RequestHandler, StorageError};
use crate::model::{Request, RequestKind, Response};

/// Mock terminal handler returning canned responses per request kind.
///
/// Unregistered kinds produce [`Response::Empty`].
#[derive(Default)]
pub struct MockDataService {
    responses: RwLock<HashMap<RequestKind, Response>>,
    requests: RwLock<Vec<Request>>,
    fail_on_process: RwLock<bool>,
}

impl MockDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn respond(&self, kind: RequestKind, response: Response) {
        self.responses.write().await.insert(kind, response);
    }

    pub async fn set_fail_on_process(&self, fail: bool) {
        *self.fail_on_process.write().await = fail;
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl RequestHandler for MockDataService {
    fn name(&self) -> &str {
        "mock-data-service"
    }

    async fn process(&self, request: &Request) -> Result<Response> {
        self.requests.write().await.push(request.clone());

        if *self.fail_on_process.read().await {
            return Err(PipelineError::DataAccess(StorageError::Unavailable(
                "data service unavailable".to_string(),
            )));
        }

        Ok(self
            .responses
            .read()
            .await
            .get(&request.kind())
            .cloned()
            .unwrap_or(Response::Empty))
    }
}
