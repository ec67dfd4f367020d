//! Batched ERC-20 and native-balance lookups.
//!
//! Each function fixes a method signature and a result interpretation, then
//! forwards to [`MulticallClient::call`]. Sub-calls that return no data (e.g.
//! the token has no code at the queried block) read as zero.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};
use chaincall_batch::{BatchRequest, MulticallClient};
use chaincall_core::{CallOptions, MulticallError};

use crate::codec::{AbiCodec, CallInput};
use crate::method::MethodDescriptor;

pub const BALANCE_OF: &str = "function balanceOf(address owner) view returns (uint256)";
pub const ALLOWANCE: &str =
    "function allowance(address owner, address spender) view returns (uint256)";
/// Multicall3's own native balance getter.
pub const GET_ETH_BALANCE: &str =
    "function getEthBalance(address addr) view returns (uint256 balance)";

/// Inputs per aggregate call for the lookups in this module.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 5_000;

/// First field as an unsigned integer; zero when there are no fields.
pub fn uint_or_zero(fields: Vec<DynSolValue>) -> U256 {
    fields
        .first()
        .and_then(DynSolValue::as_uint)
        .map_or(U256::ZERO, |(value, _bits)| value)
}

/// `token.balanceOf(holder)` for every holder, in order.
pub async fn balance_of(
    client: &MulticallClient,
    holders: &[Address],
    token: Address,
    options: &CallOptions,
) -> Result<Vec<U256>, MulticallError> {
    let inputs: Vec<CallInput> = holders.iter().copied().map(CallInput::from).collect();
    batched_uint(client, BALANCE_OF, token, &inputs, options)
        .await
        .map_err(|e| e.context("fetching balances via multicall"))
}

/// `token.allowance(owner, spender)` for every `(owner, spender)` pair, in order.
pub async fn allowance(
    client: &MulticallClient,
    pairs: &[(Address, Address)],
    token: Address,
    options: &CallOptions,
) -> Result<Vec<U256>, MulticallError> {
    let inputs: Vec<CallInput> = pairs.iter().copied().map(CallInput::from).collect();
    batched_uint(client, ALLOWANCE, token, &inputs, options)
        .await
        .map_err(|e| e.context("fetching allowances via multicall"))
}

/// Native balance of every holder, read through the aggregator itself.
pub async fn eth_balances(
    client: &MulticallClient,
    holders: &[Address],
    options: &CallOptions,
) -> Result<Vec<U256>, MulticallError> {
    let inputs: Vec<CallInput> = holders.iter().copied().map(CallInput::from).collect();
    batched_uint(client, GET_ETH_BALANCE, client.aggregator(), &inputs, options)
        .await
        .map_err(|e| e.context("fetching native balances via multicall"))
}

async fn batched_uint(
    client: &MulticallClient,
    signature: &str,
    target: Address,
    inputs: &[CallInput],
    options: &CallOptions,
) -> Result<Vec<U256>, MulticallError> {
    let codec = AbiCodec::new(MethodDescriptor::parse(signature)?);
    tracing::debug!(
        method = codec.method().name(),
        %target,
        inputs = inputs.len(),
        block = %options.block,
        "erc20: batched lookup"
    );
    let request = BatchRequest::new(target, inputs)
        .max_batch_size(DEFAULT_MAX_BATCH_SIZE)
        .options(options.clone());
    client.call(request, codec, uint_or_zero).await
}
