//! Gateway configuration
//!
//! Built once at startup and never mutated afterwards. Binaries fill it from
//! command-line flags and environment variables (`PROXY`, `TOKEN`, ...).

use std::collections::HashSet;
use std::time::Duration;

/// JSON-RPC endpoint used by the browser extension
pub const DEFAULT_UPSTREAM_URL: &str = "https://www2.deepl.com/jsonrpc";

/// Per-call timeout applied to every upstream request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Set of tokens accepted by the HTTP surface
///
/// Parsed from a comma-separated list without trimming. An empty list string
/// parses to the single entry `""`, which admits requests that carry no token
/// at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenAllowList(HashSet<String>);

impl TokenAllowList {
    /// Parse a comma-separated token list
    ///
    /// # Example
    ///
    /// ```
    /// use deeplx::config::TokenAllowList;
    ///
    /// let tokens = TokenAllowList::parse("abc,def");
    /// assert!(tokens.contains("abc"));
    /// assert!(!tokens.contains(""));
    ///
    /// let open = TokenAllowList::parse("");
    /// assert!(open.contains(""));
    /// ```
    pub fn parse(raw: &str) -> Self {
        TokenAllowList(raw.split(',').map(str::to_string).collect())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// True if any of the candidate tokens is on the list
    pub fn authorizes<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> bool {
        candidates.into_iter().any(|token| self.contains(token))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenAllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TokenAllowList(iter.into_iter().map(Into::into).collect())
    }
}

/// Immutable process-wide configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub upstream_url: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub tokens: TokenAllowList,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            tokens: TokenAllowList::parse(""),
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }

    /// Route upstream traffic through `proxy`; an empty address means direct
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tokens(mut self, tokens: TokenAllowList) -> Self {
        self.tokens = tokens;
        self
    }
}
