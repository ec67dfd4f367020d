//! Batch partitioning.
//!
//! An input list of length `len` is split into `ceil(len / size)` contiguous
//! ranges. Ranges are disjoint, ordered, and together cover `[0, len)`, which
//! is what lets every batch own its own slice of the output buffer.

use std::num::NonZeroUsize;

/// A contiguous `[start, end)` slice of the input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchRange {
    /// Position of this batch among all batches of one invocation.
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl BatchRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of batches needed for `len` inputs.
pub fn batch_count(len: usize, max_batch_size: NonZeroUsize) -> usize {
    len.div_ceil(max_batch_size.get())
}

/// Split `[0, len)` into contiguous ranges of at most `max_batch_size`.
///
/// Only the last range may be shorter. `len == 0` yields no ranges.
pub fn partition(len: usize, max_batch_size: NonZeroUsize) -> Vec<BatchRange> {
    let size = max_batch_size.get();
    (0..batch_count(len, max_batch_size))
        .map(|index| {
            let start = index * size;
            BatchRange {
                index,
                start,
                end: (start + size).min(len),
            }
        })
        .collect()
}
