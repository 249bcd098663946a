//! Mock RemoteInvoker for testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::interfaces::remote_invoker::Result;
use crate::interfaces::{RemoteInvoker, RemotePayload};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: String,
    pub args: Vec<Value>,
}

/// Mock invoker that replays scripted replies in order.
///
/// Once the script runs out every call is accepted with `[true, "ok"]`.
#[derive(Default)]
pub struct MockRemoteInvoker {
    replies: RwLock<VecDeque<Result<RemotePayload>>>,
    calls: RwLock<Vec<RecordedCall>>,
}

impl MockRemoteInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next unanswered call.
    pub async fn push_reply(&self, reply: Result<RemotePayload>) {
        self.replies.write().await.push_back(reply);
    }

    /// Queue a `(success, message)` reply.
    pub async fn push_outcome(&self, success: bool, message: &str) {
        self.push_reply(Ok(json!([success, message]))).await;
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl RemoteInvoker for MockRemoteInvoker {
    async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<RemotePayload> {
        self.calls.write().await.push(RecordedCall {
            operation: operation.to_string(),
            args,
        });

        match self.replies.write().await.pop_front() {
            Some(reply) => reply,
            None => Ok(json!([true, "ok"])),
        }
    }
}
