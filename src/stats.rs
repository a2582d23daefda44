//! Draw and rejection counters for the shuffle path (`stats` feature).
//!
//! Counters saturate instead of wrapping: a long-lived `Shuffler` reporting
//! `u64::MAX` is clearer than one that silently restarts from zero.

/// Saturating add for a `u64` counter.
#[inline(always)]
pub(crate) fn sat_add_u64(counter: &mut u64, delta: u64) {
    *counter = counter.saturating_add(delta);
}

/// Cumulative counters for one `Shuffler`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShuffleStats {
    /// Completed shuffle or partial-shuffle calls.
    pub shuffles: u64,
    /// Accepted batches (one per group of swaps).
    pub batches: u64,
    /// Words taken from the random source, including rejected ones.
    pub draws: u64,
}

impl ShuffleStats {
    /// Draws discarded by the rejection loop.
    ///
    /// Each accepted batch keeps exactly one draw, so everything else was
    /// rejected.
    #[inline]
    pub fn rejections(&self) -> u64 {
        self.draws.saturating_sub(self.batches)
    }

    /// Average words consumed per swap, or 0 before any batch.
    pub fn draws_per_batch(&self) -> f64 {
        if self.batches == 0 {
            return 0.0;
        }
        self.draws as f64 / self.batches as f64
    }
}
