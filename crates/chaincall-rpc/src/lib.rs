//! # chaincall-rpc
//!
//! Node access for ChainCall:
//!
//! - [`RpcTransport`] — async JSON-RPC transport trait
//! - [`HttpRpcClient`] — `reqwest` transport with exponential-backoff retry
//! - [`RpcCallExecutor`] — [`CallExecutor`](chaincall_core::CallExecutor)
//!   that sends Multicall3 `aggregate` through `eth_call`

pub mod error;
pub mod executor;
pub mod http;
pub mod request;
pub mod retry;
pub mod transport;

pub use error::TransportError;
pub use executor::RpcCallExecutor;
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::RpcTransport;
