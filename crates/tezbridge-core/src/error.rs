#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("missing host: set the host parameter")]
    MissingHost,

    #[error("protocol `{0}` doesn't exist in protocols")]
    UnknownProtocol(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("invalid response data: {0}")]
    InvalidData(String),

    /// A step's pending work failed. The original failure is kept as the
    /// error source.
    #[error("step chain failed: {0}")]
    StepChain(#[source] Box<CoreError>),
}

/// Failures of a single HTTP round trip.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status. `body` is the raw response text.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    InvalidResponse(String),

    #[error("invalid request URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cannot encode request body: {0}")]
    InvalidRequest(#[source] serde_json::Error),
}
