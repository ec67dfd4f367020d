//! Transport-level error types.

use chaincall_core::ExecuteError;
use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors raised while talking to a JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, TLS failure, non-2xx status, ...
    #[error("HTTP error: {0}")]
    Http(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// No response within the configured request timeout.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The response body did not have the expected shape.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Transient failures worth retrying. Node-side errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}

impl From<TransportError> for ExecuteError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Rpc(err) => ExecuteError::Rpc {
                code: err.code,
                message: err.message,
            },
            TransportError::Deserialization(err) => ExecuteError::MalformedResponse {
                reason: err.to_string(),
            },
            other => ExecuteError::Transport(other.to_string()),
        }
    }
}
