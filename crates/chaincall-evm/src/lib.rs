//! # chaincall-evm
//!
//! EVM side of ChainCall:
//!
//! - [`MethodDescriptor`] — selector plus input/output parameter types, from a
//!   human-readable signature or a JSON ABI
//! - [`CallInput`] — a logical input, either one argument or an argument tuple
//! - [`AbiCodec`] — the [`CallCodec`](chaincall_core::CallCodec) implementation
//!   over `alloy-dyn-abi`
//! - [`multicall3`] — `aggregate` calldata and return-data encoding
//! - [`erc20`] — ready-made batched lookups (`balanceOf`, `allowance`, native
//!   balances)

pub mod codec;
pub mod erc20;
pub mod method;
pub mod multicall3;

pub use codec::{AbiCodec, CallInput};
pub use method::MethodDescriptor;
