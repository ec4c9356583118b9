//! Upstream transport trait and the reqwest implementation
//!
//! The protocol logic talks to the service only through [`UpstreamTransport`],
//! so the same pipeline runs over a real HTTP client or over
//! [`MockTransport`](crate::jsonrpc::mock::MockTransport) in tests.

use crate::config::GatewayConfig;
use crate::jsonrpc::error::{GatewayError, GatewayResult};
use crate::jsonrpc::payload::RpcMethod;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Client name and version the service sees in the query string
pub const CLIENT_ID: &str = "chrome-extension,1.28.0";

/// Headers sent by the DeepL browser extension, reproduced verbatim
pub const EXTENSION_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    (
        "accept-language",
        "en-US,en;q=0.9,zh-CN;q=0.8,zh-TW;q=0.7,zh-HK;q=0.6,zh;q=0.5",
    ),
    ("authorization", "None"),
    ("cache-control", "no-cache"),
    ("content-type", "application/json"),
    ("dnt", "1"),
    (
        "origin",
        "chrome-extension://cofdbpoegempjloogbagkncekinflcnj",
    ),
    ("pragma", "no-cache"),
    ("priority", "u=1, i"),
    ("referer", "https://www.deepl.com/"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "none"),
    ("sec-gpc", "1"),
    (
        "user-agent",
        "DeepLBrowserExtension/1.28.0 Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
    ),
];

/// Raw upstream answer: HTTP status and undecoded body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Generic trait for delivering a formatted JSON-RPC body upstream
///
/// Implementations only move bytes. Status interpretation and body decoding
/// stay with the gateway so they are written once.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Send `body` for `method` and return the raw reply
    ///
    /// # Returns
    ///
    /// * `Ok(UpstreamReply)` - Any HTTP answer, successful or not
    /// * `Err(GatewayError::Transport)` - Network failure, timeout or connection error
    async fn send(&self, method: RpcMethod, body: String) -> GatewayResult<UpstreamReply>;

    /// Name used in logs
    fn transport_name(&self) -> &str;
}

/// reqwest-backed transport with a pooled client
///
/// The client is built once with the extension headers, the optional proxy
/// and the per-call timeout, and then shared by every request.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport from configuration
    ///
    /// # Errors
    ///
    /// * `GatewayError::Config` - If the proxy address is invalid or the client cannot be built
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let mut builder = reqwest::Client::builder()
            .default_headers(extension_headers()?)
            .timeout(config.timeout);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| GatewayError::Config(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.upstream_url.clone(),
        })
    }

    /// Full URL for one RPC method
    pub fn url_for(&self, method: RpcMethod) -> String {
        format!("{}?client={}&method={}", self.endpoint, CLIENT_ID, method)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn extension_headers() -> GatewayResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(EXTENSION_HEADERS.len());
    for &(name, value) in EXTENSION_HEADERS {
        let name = HeaderName::from_static(name);
        let value = HeaderValue::from_str(value)
            .map_err(|e| GatewayError::Config(format!("Invalid header '{}': {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait]
impl UpstreamTransport for HttpTransport {
    async fn send(&self, method: RpcMethod, body: String) -> GatewayResult<UpstreamReply> {
        let response = self.client.post(self.url_for(method)).body(body).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(UpstreamReply::new(status, body.to_vec()))
    }

    fn transport_name(&self) -> &str {
        "HTTP"
    }
}
