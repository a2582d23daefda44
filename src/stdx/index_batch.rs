//! Fixed-capacity, stack-allocated scratch for one batch of swap indices.
//!
//! # Invariants
//! - `len <= MAX_BATCH` at all times.
//! - Slots in `0..len` hold the indices written by the most recent batch.
//! - Slots in `len..MAX_BATCH` are stale and never exposed.
//!
//! # Design Notes
//! - Indices are plain `u64`, so the buffer is zero-initialized once and
//!   overwritten in place; no `MaybeUninit` bookkeeping is needed.
//! - Overflow panics instead of growing, keeping the shuffle path
//!   allocation-free.
//! - One buffer is owned by each `Shuffler` and lent to the batch generator
//!   by `&mut`, so it is never aliased across concurrent batches.

use std::fmt;
use std::ops::Deref;

/// Largest batch the generator supports.
///
/// Six is the most consecutive lengths whose product still fits in 64 bits
/// for a useful range of `n` (up to 1627).
pub const MAX_BATCH: usize = 6;

/// Ordered indices extracted from a single random draw.
///
/// # Guarantees
/// - Capacity is always `MAX_BATCH`; this type never allocates.
/// - `self[i]` is the index drawn for the `i`-th shrinking range of the batch.
///
/// # Panics
/// - `reset` panics if asked for more than `MAX_BATCH` slots.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IndexBatch {
    // Number of live indices in `buf`.
    len: usize,
    buf: [u64; MAX_BATCH],
}

impl IndexBatch {
    /// Creates an empty batch.
    pub const fn new() -> Self {
        Self {
            len: 0,
            buf: [0; MAX_BATCH],
        }
    }

    /// Prepares the batch to receive `len` indices and returns the writable
    /// slots.
    ///
    /// # Panics
    /// - Panics if `len > MAX_BATCH`.
    #[inline]
    pub(crate) fn reset(&mut self, len: usize) -> &mut [u64] {
        assert!(len <= MAX_BATCH, "IndexBatch capacity exceeded");
        self.len = len;
        &mut self.buf[..len]
    }

    /// Returns the live indices.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.buf[..self.len]
    }
}

impl Default for IndexBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IndexBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl Deref for IndexBatch {
    type Target = [u64];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}
