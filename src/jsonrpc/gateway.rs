//! The translation pipeline: split, build jobs, translate, reduce
//!
//! # Example
//!
//! ```ignore
//! use deeplx::config::GatewayConfig;
//! use deeplx::jsonrpc::{TranslateRequest, TranslationGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = TranslationGateway::from_config(&GatewayConfig::new())?;
//!     let request = TranslateRequest::new("Hello. How are you?").target_lang("de");
//!     let result = gateway.translate(&request).await?;
//!     println!("{}", result.data);
//!     Ok(())
//! }
//! ```

use crate::config::GatewayConfig;
use crate::jsonrpc::error::{GatewayError, GatewayResult};
use crate::jsonrpc::ident::{count_i, new_id, timestamp};
use crate::jsonrpc::jobs::{DEFAULT_BEAM_COUNT, TranslationJob, build_jobs};
use crate::jsonrpc::payload::{CommonJobParams, RequestEnvelope, RpcMethod, format_payload};
use crate::jsonrpc::reducer::{HandleJobsResult, TranslationResult, UpstreamResponse, reduce};
use crate::jsonrpc::transport::{HttpTransport, UpstreamTransport};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source language value that defers to the upstream detector
pub const AUTO_LANG: &str = "auto";

/// One translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub preferred_num_beams: usize,
    pub tag_handling: bool,
}

impl TranslateRequest {
    /// Request with the defaults: `auto` to `en`, 4 beams, no tag handling
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: AUTO_LANG.to_string(),
            target_lang: "en".to_string(),
            preferred_num_beams: DEFAULT_BEAM_COUNT,
            tag_handling: false,
        }
    }

    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.source_lang = lang.into();
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = lang.into();
        self
    }

    pub fn preferred_num_beams(mut self, beams: usize) -> Self {
        self.preferred_num_beams = beams;
        self
    }

    pub fn tag_handling(mut self, enabled: bool) -> Self {
        self.tag_handling = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobsLang {
    pub source_lang_computed: String,
    pub target_lang: String,
}

/// `params` of an `LMT_handle_jobs` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandleJobsParams {
    #[serde(rename = "commonJobParams")]
    pub common_job_params: CommonJobParams,
    pub lang: JobsLang,
    pub jobs: Vec<TranslationJob>,
    pub priority: u8,
    pub timestamp: i64,
}

/// Incoming JSON-RPC envelope before shape validation
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    id: Option<i64>,
    result: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

/// A decoded, shape-checked JSON-RPC response
#[derive(Debug, Clone)]
pub struct RpcResponse<R> {
    /// Id echoed by the upstream (falls back to the request id)
    pub id: i64,
    pub result: R,
}

/// Parse a response body as JSON, falling back to Brotli-compressed JSON
///
/// # Errors
///
/// * `GatewayError::Decode` - If the body is neither
pub fn decode_body(body: &[u8]) -> GatewayResult<serde_json::Value> {
    match serde_json::from_slice(body) {
        Ok(value) => Ok(value),
        Err(plain_err) => {
            warn!("upstream body is not plain JSON, trying brotli");
            let mut decompressed = Vec::new();
            brotli::Decompressor::new(body, 4096)
                .read_to_end(&mut decompressed)
                .map_err(|e| {
                    GatewayError::Decode(format!("{} (brotli: {})", plain_err, e))
                })?;
            serde_json::from_slice(&decompressed).map_err(|e| GatewayError::Decode(e.to_string()))
        }
    }
}

/// Orchestrates the two upstream phases over a shared transport
///
/// Cloning is cheap; all clones share one transport (and so one connection pool).
#[derive(Clone)]
pub struct TranslationGateway {
    transport: Arc<dyn UpstreamTransport>,
}

impl TranslationGateway {
    pub fn new(transport: impl UpstreamTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Gateway over an [`HttpTransport`] built from `config`
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }

    pub fn transport_name(&self) -> &str {
        self.transport.transport_name()
    }

    /// Issue one upstream call with a fresh id and decode its result
    pub(crate) async fn call<P, R>(
        &self,
        method: RpcMethod,
        params: P,
    ) -> GatewayResult<RpcResponse<R>>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let envelope = RequestEnvelope::new(method, new_id(), params);
        let body = format_payload(&envelope)?;
        debug!(%method, id = envelope.id, bytes = body.len(), "calling upstream");

        let reply = self.transport.send(method, body).await?;
        if !reply.is_success() {
            warn!(%method, status = reply.status, "upstream returned failure status");
            return Err(GatewayError::Upstream {
                status: reply.status,
                body: reply.text(),
            });
        }

        let envelope_in: RpcEnvelope = serde_json::from_value(decode_body(&reply.body)?)
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;
        if let Some(error) = envelope_in.error {
            return Err(GatewayError::Rpc(error.to_string()));
        }
        let result = envelope_in
            .result
            .ok_or_else(|| GatewayError::Malformed(format!("{} response has no result", method)))?;
        let result = serde_json::from_value(result)
            .map_err(|e| GatewayError::Malformed(format!("{} result: {}", method, e)))?;

        Ok(RpcResponse {
            id: envelope_in.id.unwrap_or(envelope.id),
            result,
        })
    }

    /// Translate one text
    ///
    /// Runs the split phase, resolves `auto` to the detected language, builds
    /// one job per chunk and issues `LMT_handle_jobs` with a freshly generated
    /// id. Nothing is retried.
    ///
    /// # Errors
    ///
    /// * `GatewayError::EmptyText` - If the text is empty; no upstream call is made
    /// * Any error of the split or translate call, unchanged
    pub async fn translate(&self, request: &TranslateRequest) -> GatewayResult<TranslationResult> {
        if request.text.is_empty() {
            return Err(GatewayError::EmptyText);
        }

        let split = self.split(&request.text, request.tag_handling).await?;

        let source_lang = if request.source_lang == AUTO_LANG {
            split.detected_lang.to_lowercase()
        } else {
            request.source_lang.clone()
        };

        let i_count = count_i(&request.text);
        let jobs = build_jobs(&split.chunks, request.preferred_num_beams);
        let job_count = jobs.len();

        let params = HandleJobsParams {
            common_job_params: CommonJobParams::default(),
            lang: JobsLang {
                source_lang_computed: source_lang.to_uppercase(),
                target_lang: request.target_lang.to_uppercase(),
            },
            jobs,
            priority: 1,
            timestamp: timestamp(i_count),
        };

        let response: RpcResponse<HandleJobsResult> =
            self.call(RpcMethod::HandleJobs, params).await?;
        let result = reduce(UpstreamResponse {
            id: response.id,
            result: response.result,
        })?;

        info!(
            "Translated {} chunk(s) {} → {}",
            job_count, result.source_lang, result.target_lang
        );
        Ok(result)
    }
}

impl std::fmt::Debug for TranslationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationGateway")
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}
