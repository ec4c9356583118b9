/// JSON-RPC Protocol Client
///
/// This module emulates the private JSON-RPC protocol spoken by the DeepL
/// browser extension, so translations can be obtained without an API key.
///
/// # Overview
///
/// A translation is two strictly sequential upstream calls:
///
/// 1. **Split phase** (`LMT_split_text`) - Breaks the input into sentence chunks and detects its language
/// 2. **Job building** - Turns each chunk into a job with one sentence of context on either side
/// 3. **Translate phase** (`LMT_handle_jobs`) - Translates every job into a ranked list of beams
/// 4. **Reduction** - Joins beam 0 into the primary translation and each beam rank into an alternative
///
/// Request ids, job timestamps and the body formatting follow the numeric and
/// byte-level shapes the service expects from its own client.
///
/// # Example
///
/// ```ignore
/// use deeplx::config::GatewayConfig;
/// use deeplx::jsonrpc::{TranslateRequest, TranslationGateway};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gateway = TranslationGateway::from_config(&GatewayConfig::new())?;
///     let result = gateway
///         .translate(&TranslateRequest::new("Hello. How are you?").target_lang("de"))
///         .await?;
///
///     println!("{}", result.data);
///     for alternative in &result.alternatives {
///         println!("  {}", alternative);
///     }
///     Ok(())
/// }
/// ```
pub mod error;
pub mod gateway;
pub mod ident;
pub mod jobs;
pub mod mock;
pub mod payload;
pub mod reducer;
pub mod split;
pub mod transport;


pub use error::{GatewayError, GatewayResult};
pub use gateway::{AUTO_LANG, TranslateRequest, TranslationGateway, decode_body};
pub use ident::{count_i, new_id, timestamp};
pub use jobs::{DEFAULT_BEAM_COUNT, TranslationJob, build_jobs};
pub use mock::{MockReply, MockTransport, RecordedCall};
pub use payload::{RequestEnvelope, RpcMethod, format_payload};
pub use reducer::{TRANSLATION_METHOD, TranslationResult, reduce};
pub use split::{SplitChunk, SplitOutcome, TextType, is_richtext};
pub use transport::{HttpTransport, UpstreamReply, UpstreamTransport};
