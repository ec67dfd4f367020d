//! Multicall3 `aggregate` bindings.
//!
//! `aggregate((address,bytes)[] calls) returns (uint256 blockNumber, bytes[] returnData)`
//! executes every call in one block context and reverts if any sub-call
//! reverts.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolCall;
use chaincall_core::{AggregateResult, Call, ExecuteError};

mod abi {
    alloy_sol_types::sol! {
        struct Call {
            address target;
            bytes callData;
        }

        function aggregate(Call[] calls)
            external
            payable
            returns (uint256 blockNumber, bytes[] returnData);
    }
}

/// `aggregate((address,bytes)[])` selector.
pub const AGGREGATE_SELECTOR: [u8; 4] = abi::aggregateCall::SELECTOR;

/// Calldata for `aggregate(calls)`.
pub fn encode_aggregate(calls: &[Call]) -> Bytes {
    abi::aggregateCall {
        calls: calls
            .iter()
            .map(|c| abi::Call {
                target: c.target,
                callData: c.call_data.clone(),
            })
            .collect(),
    }
    .abi_encode()
    .into()
}

/// Decode the return data of `aggregate`.
pub fn decode_aggregate(data: &[u8]) -> Result<AggregateResult, ExecuteError> {
    let ret = abi::aggregateCall::abi_decode_returns(data, true).map_err(|e| {
        ExecuteError::MalformedResponse {
            reason: format!("aggregate return data ({} bytes): {e}", data.len()),
        }
    })?;

    Ok(AggregateResult {
        block_number: u64::try_from(ret.blockNumber).unwrap_or(u64::MAX),
        return_data: ret.returnData,
    })
}

/// Decode `aggregate` calldata back into its calls. Used by node simulators.
pub fn decode_aggregate_calls(data: &[u8]) -> Result<Vec<Call>, ExecuteError> {
    let call = abi::aggregateCall::abi_decode(data, true).map_err(|e| {
        ExecuteError::MalformedResponse {
            reason: format!("aggregate calldata: {e}"),
        }
    })?;

    Ok(call
        .calls
        .into_iter()
        .map(|c| Call {
            target: c.target,
            call_data: c.callData,
        })
        .collect())
}

/// Encode `aggregate` return data. Used by node simulators.
pub fn encode_aggregate_result(result: &AggregateResult) -> Bytes {
    abi::aggregateCall::abi_encode_returns(&(
        U256::from(result.block_number),
        result.return_data.clone(),
    ))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    #[test]
    fn aggregate_selector() {
        // keccak256("aggregate((address,bytes)[])")[:4]
        assert_eq!(hex::encode(AGGREGATE_SELECTOR), "252dba42");
    }

    #[test]
    fn calls_survive_the_aggregate_encoding() {
        let calls = vec![
            Call {
                target: Address::repeat_byte(0xAA),
                call_data: Bytes::from(vec![0x70, 0xa0, 0x82, 0x31, 1, 2, 3]),
            },
            Call {
                target: Address::repeat_byte(0xBB),
                call_data: Bytes::new(),
            },
        ];

        let calldata = encode_aggregate(&calls);
        assert_eq!(&calldata[..4], AGGREGATE_SELECTOR.as_slice());
        assert_eq!(decode_aggregate_calls(&calldata).unwrap(), calls);
    }

    #[test]
    fn decode_return_data() {
        let result = AggregateResult {
            block_number: 19_000_000,
            return_data: vec![Bytes::from(vec![0u8; 32]), Bytes::new()],
        };
        let decoded = decode_aggregate(&encode_aggregate_result(&result)).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn garbage_return_data_is_malformed() {
        assert!(matches!(
            decode_aggregate(&[0xde, 0xad]),
            Err(ExecuteError::MalformedResponse { .. })
        ));
        assert!(matches!(
            decode_aggregate(&[]),
            Err(ExecuteError::MalformedResponse { .. })
        ));
    }
}
