//! The `RpcTransport` trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Sends JSON-RPC requests to one endpoint.
///
/// Implementations own retries and timeouts; callers see one result per
/// request. Object-safe, so it can be held as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Endpoint identifier for logs.
    fn url(&self) -> &str;
}

/// Send `method(params)` and deserialize the result.
pub async fn call<T, R>(
    transport: &T,
    id: u64,
    method: &str,
    params: Vec<Value>,
) -> Result<R, TransportError>
where
    T: RpcTransport + ?Sized,
    R: DeserializeOwned,
{
    let resp = transport
        .send(JsonRpcRequest::new(id, method, params))
        .await?;
    let result = resp.into_result().map_err(TransportError::Rpc)?;
    Ok(serde_json::from_value(result)?)
}
