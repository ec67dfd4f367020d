//! Per-invocation request configuration.

use chaincall_core::{Address, CallOptions, DEFAULT_MAX_BATCH_SIZE};

/// One batched invocation: every input is called against the same `target`.
#[derive(Debug, Clone)]
pub struct BatchRequest<'a, I> {
    /// Contract every sub-call is sent to. Must be non-zero.
    pub target: Address,
    /// Logical inputs, in the order results are returned.
    pub inputs: &'a [I],
    /// Max inputs per aggregate call. Must be at least 1.
    pub max_batch_size: usize,
    /// `0` = engine default, negative = unlimited, positive = cap.
    pub max_concurrency: i64,
    /// Passed through to the executor.
    pub options: CallOptions,
}

impl<'a, I> BatchRequest<'a, I> {
    pub fn new(target: Address, inputs: &'a [I]) -> Self {
        Self {
            target,
            inputs,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_concurrency: 0,
            options: CallOptions::default(),
        }
    }

    pub fn max_batch_size(mut self, n: usize) -> Self {
        self.max_batch_size = n;
        self
    }

    pub fn max_concurrency(mut self, n: i64) -> Self {
        self.max_concurrency = n;
        self
    }

    pub fn options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}
