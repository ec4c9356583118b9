//! JSON-RPC request envelopes and their wire formatting
//!
//! The upstream service only accepts bodies whose `method` key is spaced the
//! way its own client spaces it, and that spacing depends on the request id.
//! [`format_payload`] reproduces this byte for byte.

use crate::jsonrpc::error::{GatewayError, GatewayResult};
use serde::Serialize;
use std::fmt;

/// The two RPC methods the gateway speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RpcMethod {
    /// Split raw text into sentence chunks and detect its language
    #[serde(rename = "LMT_split_text")]
    SplitText,
    /// Translate a batch of sentence jobs
    #[serde(rename = "LMT_handle_jobs")]
    HandleJobs,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::SplitText => "LMT_split_text",
            RpcMethod::HandleJobs => "LMT_handle_jobs",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound JSON-RPC envelope
///
/// Field order is part of the wire format: `jsonrpc`, `method`, `id`, `params`.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<P> {
    pub jsonrpc: &'static str,
    pub method: RpcMethod,
    pub id: i64,
    pub params: P,
}

impl<P: Serialize> RequestEnvelope<P> {
    pub fn new(method: RpcMethod, id: i64, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            id,
            params,
        }
    }
}

/// `commonJobParams` block shared by both phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonJobParams {
    pub mode: &'static str,
}

impl Default for CommonJobParams {
    fn default() -> Self {
        Self { mode: "translate" }
    }
}

const METHOD_KEY: &str = r#""method":""#;
const METHOD_KEY_SPACED_BOTH: &str = r#""method" : ""#;
const METHOD_KEY_SPACED_AFTER: &str = r#""method": ""#;

/// Whether `id` selects the space-before-colon variant
pub fn spaces_before_colon(id: i64) -> bool {
    (id + 5) % 29 == 0 || (id + 3) % 13 == 0
}

/// Serialize an envelope to the exact bytes the upstream expects
///
/// The envelope is serialized compactly, then only the first `"method":"`
/// is rewritten to `"method" : "` or `"method": "` depending on the id.
///
/// # Errors
///
/// * `GatewayError::Encode` - If the params fail to serialize
pub fn format_payload<P: Serialize>(envelope: &RequestEnvelope<P>) -> GatewayResult<String> {
    let compact =
        serde_json::to_string(envelope).map_err(|e| GatewayError::Encode(e.to_string()))?;
    Ok(apply_method_spacing(&compact, envelope.id))
}

fn apply_method_spacing(compact: &str, id: i64) -> String {
    let replacement = if spaces_before_colon(id) {
        METHOD_KEY_SPACED_BOTH
    } else {
        METHOD_KEY_SPACED_AFTER
    };
    compact.replacen(METHOD_KEY, replacement, 1)
}
