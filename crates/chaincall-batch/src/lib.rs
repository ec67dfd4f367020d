//! # chaincall-batch
//!
//! Turns one logical request of N read calls into `ceil(N / max_batch_size)`
//! aggregate calls, runs them as tokio tasks under a concurrency bound, and
//! merges the interpreted results back into input order.
//!
//! ## Usage
//! ```ignore
//! use chaincall_batch::{BatchRequest, MulticallClient};
//!
//! let client = MulticallClient::new(executor);
//! let request = BatchRequest::new(token, &inputs).max_batch_size(500);
//! let balances = client.call(request, codec, |fields| fields.len()).await?;
//! ```

pub mod engine;
pub mod request;

pub use engine::MulticallClient;
pub use request::BatchRequest;
