//! The `CallExecutor` trait — one aggregated round trip to a node.

use alloy_primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ExecuteError;
use crate::types::{AggregateResult, Call, CallOptions};

/// Executes a list of calls through an on-chain aggregator contract.
///
/// # Contract
/// - exactly one network round trip per invocation
/// - `return_data[i]` belongs to `calls[i]`
/// - any transport, node-side, or response-shape failure is an `Err`
///
/// Implementations must be `Send + Sync`; the engine holds them as
/// `Arc<dyn CallExecutor>`.
#[async_trait]
pub trait CallExecutor: Send + Sync {
    async fn aggregate(
        &self,
        aggregator: Address,
        options: &CallOptions,
        calls: Vec<Call>,
    ) -> Result<AggregateResult, ExecuteError>;
}

#[async_trait]
impl<T: CallExecutor + ?Sized> CallExecutor for Arc<T> {
    async fn aggregate(
        &self,
        aggregator: Address,
        options: &CallOptions,
        calls: Vec<Call>,
    ) -> Result<AggregateResult, ExecuteError> {
        (**self).aggregate(aggregator, options, calls).await
    }
}
