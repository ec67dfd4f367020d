//! # chaincall-core
//!
//! Types, collaborator traits and errors shared by every ChainCall crate.
//!
//! - [`Call`] / [`AggregateResult`] — what goes into and comes out of one
//!   aggregator round trip
//! - [`CallCodec`] — turns a logical input into calldata and raw output back
//!   into typed fields
//! - [`CallExecutor`] — performs the aggregated call against a node
//! - [`partition`] — splits an input list into contiguous batches
//! - [`MulticallConfig`] — aggregator address and concurrency settings

pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod types;

pub use alloy_primitives::{Address, Bytes};
pub use batch::{batch_count, partition, BatchRange};
pub use codec::CallCodec;
pub use config::{
    Concurrency, MulticallConfig, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_CONCURRENT_CALLS,
    DEFAULT_MULTICALL_ADDRESS,
};
pub use error::{CodecError, ExecuteError, MulticallError};
pub use executor::CallExecutor;
pub use types::{AggregateResult, BlockTag, Call, CallOptions};
