//! Values exchanged between the batch engine and the call executor.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One encoded sub-call, ready to be packed into an aggregate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Contract the sub-call is executed against.
    pub target: Address,
    /// `selector ++ abi_encode(args)`
    pub call_data: Bytes,
}

/// Result of one aggregate round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    /// Block the aggregator executed the batch in.
    pub block_number: u64,
    /// Raw return data, one entry per submitted call, in submission order.
    pub return_data: Vec<Bytes>,
}

/// Block the aggregated call is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Safe,
    Finalized,
    Earliest,
    Number(u64),
}

/// Renders the JSON-RPC block parameter (`"latest"`, `"0x10d4f"`, ...).
impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Pending => write!(f, "pending"),
            Self::Safe => write!(f, "safe"),
            Self::Finalized => write!(f, "finalized"),
            Self::Earliest => write!(f, "earliest"),
            Self::Number(n) => write!(f, "{n:#x}"),
        }
    }
}

impl FromStr for BlockTag {
    type Err = String;

    /// Accepts a tag name, a decimal block number or a `0x` hex block number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "pending" => Ok(Self::Pending),
            "safe" => Ok(Self::Safe),
            "finalized" => Ok(Self::Finalized),
            "earliest" => Ok(Self::Earliest),
            other => {
                let parsed = match other.strip_prefix("0x") {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => other.parse::<u64>(),
                };
                parsed
                    .map(Self::Number)
                    .map_err(|e| format!("invalid block '{s}': {e}"))
            }
        }
    }
}

/// Execution parameters passed through to the executor untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOptions {
    #[serde(default)]
    pub block: BlockTag,
    /// Optional `from` address for the `eth_call`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
}

impl CallOptions {
    /// Options pinned to a specific block number.
    pub fn at_block(number: u64) -> Self {
        Self {
            block: BlockTag::Number(number),
            from: None,
        }
    }
}
