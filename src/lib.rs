//! Translation gateway for the DeepL browser-extension protocol
//!
//! The [`jsonrpc`] module holds the protocol-emulation client; [`config`]
//! holds the immutable startup configuration shared with the HTTP surface in
//! the `deeplx-web` crate.

pub mod config;
pub mod jsonrpc;

// Re-export main types for convenient access
pub use config::{GatewayConfig, TokenAllowList};
pub use jsonrpc::{
    GatewayError, GatewayResult, HttpTransport, MockReply, MockTransport, RpcMethod,
    TranslateRequest, TranslationGateway, TranslationResult, UpstreamTransport,
};
