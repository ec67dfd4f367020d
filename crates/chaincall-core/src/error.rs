//! Error types for the multicall pipeline.

use thiserror::Error;

/// Failure of one aggregated round trip.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Connection, timeout, HTTP status, ...
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error (e.g. `execution reverted`).
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The aggregator response could not be decoded or has the wrong shape.
    #[error("malformed aggregate response: {reason}")]
    MalformedResponse { reason: String },
}

/// Failure to encode an input or decode a sub-result.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("argument encoding failed: {reason}")]
    Encode { reason: String },

    #[error("result decoding failed: {reason}")]
    Decode { reason: String },
}

/// Errors returned by a multicall invocation.
#[derive(Debug, Error)]
pub enum MulticallError {
    /// Bad target, batch size, aggregator or method definition. Raised
    /// before anything is dispatched.
    #[error("invalid multicall configuration: {reason}")]
    Config { reason: String },

    /// Input `index` could not be packed; its batch was never sent.
    #[error("encoding input {index}: {source}")]
    Encode {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// The aggregate call for batch `batch` failed.
    #[error("multicall batch {batch} [{start}, {end}) failed: {source}")]
    Batch {
        batch: usize,
        start: usize,
        end: usize,
        #[source]
        source: ExecuteError,
    },

    /// No result was written for input `index`.
    #[error("no result produced for input {index}")]
    MissingResult { index: usize },

    /// A batch worker task ended without producing a result.
    #[error("batch worker failed: {reason}")]
    Worker { reason: String },

    /// Another error with caller context attached.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<MulticallError>,
    },
}

impl MulticallError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Wrap this error with a short description of what the caller was doing.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all `Context` layers removed.
    pub fn root(&self) -> &MulticallError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}
