/// Error types for the JSON-RPC translation pipeline
///
/// Every failure is scoped to a single `translate` call. Upstream-originated
/// messages are carried verbatim so callers see exactly what the service said.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The input text was empty; raised before any network activity
    #[error("No text to translate")]
    EmptyText,

    /// Network failure, timeout or connection error while talking upstream
    #[error("{0}")]
    Transport(String),

    /// Upstream answered with a non-success HTTP status; `body` is the raw response text
    #[error("{body}")]
    Upstream { status: u16, body: String },

    /// Response body was neither JSON nor Brotli-compressed JSON
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    /// Response body was JSON but not in the shape the protocol promises
    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    /// Upstream returned a JSON-RPC `error` member (raw JSON text)
    #[error("{0}")]
    Rpc(String),

    /// The request envelope could not be serialized
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Invalid configuration, e.g. an unparseable proxy address
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
