//! `CallExecutor` over `eth_call`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chaincall_core::{Address, AggregateResult, Call, CallExecutor, CallOptions, ExecuteError};
use chaincall_evm::multicall3;

use crate::transport::{self, RpcTransport};

/// Sends each batch as one `eth_call` to the aggregator contract.
pub struct RpcCallExecutor<T: RpcTransport> {
    transport: Arc<T>,
    next_id: AtomicU64,
}

impl<T: RpcTransport> RpcCallExecutor<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }
}

/// `eth_call` params: the call object followed by the block tag.
pub(crate) fn eth_call_params(aggregator: Address, options: &CallOptions, calldata: &[u8]) -> Vec<Value> {
    let mut tx = Map::new();
    if let Some(from) = options.from {
        tx.insert("from".into(), Value::String(from.to_string()));
    }
    tx.insert("to".into(), Value::String(aggregator.to_string()));
    tx.insert("data".into(), Value::String(format!("0x{}", hex::encode(calldata))));
    vec![Value::Object(tx), json!(options.block.to_string())]
}

fn decode_hex(s: &str) -> Result<Vec<u8>, ExecuteError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| ExecuteError::MalformedResponse {
        reason: format!("eth_call result is not hex: {e}"),
    })
}

#[async_trait]
impl<T: RpcTransport> CallExecutor for RpcCallExecutor<T> {
    async fn aggregate(
        &self,
        aggregator: Address,
        options: &CallOptions,
        calls: Vec<Call>,
    ) -> Result<AggregateResult, ExecuteError> {
        let expected = calls.len();
        let calldata = multicall3::encode_aggregate(&calls);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        tracing::trace!(
            id,
            calls = expected,
            bytes = calldata.len(),
            block = %options.block,
            url = self.transport.url(),
            "eth_call aggregate"
        );

        let raw: String = transport::call(
            self.transport.as_ref(),
            id,
            "eth_call",
            eth_call_params(aggregator, options, &calldata),
        )
        .await
        .map_err(ExecuteError::from)?;

        let result = multicall3::decode_aggregate(&decode_hex(&raw)?)?;
        if result.return_data.len() != expected {
            return Err(ExecuteError::MalformedResponse {
                reason: format!(
                    "aggregator returned {} results for {expected} calls",
                    result.return_data.len()
                ),
            });
        }
        Ok(result)
    }
}

impl<T: RpcTransport> std::fmt::Debug for RpcCallExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcCallExecutor")
            .field("url", &self.transport.url())
            .finish()
    }
}
