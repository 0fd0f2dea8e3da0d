use thiserror::Error;

/// Result type alias for proxy operations
pub type Result<T, E = ProxyError> = std::result::Result<T, E>;

/// Errors that can occur while relaying a request
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Failed to read request body: {0}")]
    RequestBodyError(String),

    #[error("Failed to read response body: {0}")]
    ResponseBodyError(String),

    #[error("Upstream request failed for {0}: {1}")]
    UpstreamRequestFailed(String, String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
