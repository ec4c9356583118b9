//! Mock upstream transport for testing
//!
//! This module provides a deterministic, network-free transport so the whole
//! pipeline can be exercised without reaching the real service.
//!
//! # Example
//!
//! ```ignore
//! use deeplx::jsonrpc::{MockReply, MockTransport, RpcMethod, TranslationGateway};
//!
//! let mock = MockTransport::new()
//!     .with_reply(RpcMethod::SplitText, MockReply::status(503, "unavailable"));
//! let gateway = TranslationGateway::new(mock.clone());
//! // ... run gateway.translate(...) and inspect mock.calls()
//! ```

use crate::jsonrpc::error::{GatewayError, GatewayResult};
use crate::jsonrpc::payload::RpcMethod;
use crate::jsonrpc::transport::{UpstreamReply, UpstreamTransport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Scripted answer for one RPC method
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this status and raw body
    Reply(UpstreamReply),
    /// Fail as if the network call itself failed
    TransportError(String),
}

impl MockReply {
    /// 200 with a JSON body
    pub fn json(value: serde_json::Value) -> Self {
        MockReply::Reply(UpstreamReply::new(200, value.to_string()))
    }

    /// Any status with a text body
    pub fn status(status: u16, body: &str) -> Self {
        MockReply::Reply(UpstreamReply::new(status, body))
    }

    /// Any status with raw bytes (e.g. a compressed body)
    pub fn raw(status: u16, body: Vec<u8>) -> Self {
        MockReply::Reply(UpstreamReply::new(status, body))
    }

    pub fn transport_error(message: &str) -> Self {
        MockReply::TransportError(message.to_string())
    }
}

/// One call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: RpcMethod,
    /// The exact formatted body that would have gone on the wire
    pub body: String,
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<RpcMethod, MockReply>,
    calls: Vec<RecordedCall>,
}

/// Mock transport that answers from a per-method script and records calls
///
/// Clones share the same script and call log, so a test can hand one clone
/// to the gateway and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for `method`, replacing any earlier one
    pub fn with_reply(self, method: RpcMethod, reply: MockReply) -> Self {
        self.lock().replies.insert(method, reply);
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn send(&self, method: RpcMethod, body: String) -> GatewayResult<UpstreamReply> {
        let mut state = self.lock();
        state.calls.push(RecordedCall { method, body });

        match state.replies.get(&method) {
            Some(MockReply::Reply(reply)) => Ok(reply.clone()),
            Some(MockReply::TransportError(msg)) => Err(GatewayError::Transport(msg.clone())),
            None => Err(GatewayError::Transport(format!(
                "no mock reply scripted for {}",
                method
            ))),
        }
    }

    fn transport_name(&self) -> &str {
        "Mock"
    }
}
