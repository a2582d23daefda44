//! Fisher-Yates walk driven by batched index generation.
//!
//! Purpose: permute a slice uniformly at random in place while taking as few
//! words from the random source as the schedule allows.
//!
//! Walk:
//! - `n` starts at the slice length. For each regime, while `n > floor`, one
//!   batch of `k` indices is drawn for ranges `n, n-1, ..., n-k+1`, then
//!   `seq[n-1-i]` is swapped with `seq[index_i]` and `n` drops by `k`.
//! - The bound returned by each batch is carried into the next batch of the
//!   same regime, so the exact product is computed at most once per regime
//!   on the common path.
//! - Lengths at or below the last floor are finished with one batch of
//!   `n - 1` indices seeded with `tail_floor!`.
//! - A partial walk stops once `amount` trailing positions are fixed; the
//!   batch that crosses the stop point is clipped.
//!
//! Invariants:
//! - Lengths 0 and 1 never touch the random source.
//! - Each position `n-1-i` is swapped exactly once, with an index uniform over
//!   `[0, n-i)`, which is the classic Fisher-Yates step.
//! - The walk allocates nothing; the index scratch lives in the `Shuffler`.

use crate::batch::try_generate_batch;
use crate::rng::{into_ok, RandomSource, Total, TryRandomSource};
use crate::schedule::BatchSchedule;
#[cfg(feature = "stats")]
use crate::rng::CountingSource;
#[cfg(feature = "stats")]
use crate::stats::{sat_add_u64, ShuffleStats};
use crate::stdx::IndexBatch;

/// Reusable shuffle driver: a schedule plus its index scratch.
///
/// # Thread Safety
///
/// `Shuffler` is `Send` but every call needs `&mut self`; use one per thread.
#[derive(Clone, Debug)]
pub struct Shuffler {
    schedule: BatchSchedule,
    batch: IndexBatch,
    #[cfg(feature = "stats")]
    stats: ShuffleStats,
}

impl Shuffler {
    pub const fn new(schedule: BatchSchedule) -> Self {
        Self {
            schedule,
            batch: IndexBatch::new(),
            #[cfg(feature = "stats")]
            stats: ShuffleStats {
                shuffles: 0,
                batches: 0,
                draws: 0,
            },
        }
    }

    #[inline]
    pub fn schedule(&self) -> &BatchSchedule {
        &self.schedule
    }

    /// Permutes `seq` uniformly at random.
    ///
    /// # Examples
    /// ```
    /// use batch_shuffle::{BatchSchedule, Shuffler, XorShift64};
    ///
    /// let mut shuffler = Shuffler::new(BatchSchedule::reference());
    /// let mut rng = XorShift64::new(0x0123_4567_89AB_CDEF);
    /// let mut deck: Vec<u32> = (0..52).collect();
    /// shuffler.shuffle(&mut deck, &mut rng);
    ///
    /// deck.sort_unstable();
    /// assert!(deck.iter().copied().eq(0..52));
    /// ```
    pub fn shuffle<T, R>(&mut self, seq: &mut [T], rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        into_ok(self.walk(seq, 0, &mut Total(rng)))
    }

    /// Permutes `seq` with a fallible source.
    ///
    /// # Errors
    /// Returns the source's error as soon as a draw fails. Swaps made before
    /// the failure are kept, so `seq` is still a permutation of its input but
    /// not a uniformly random one.
    pub fn try_shuffle<T, R>(&mut self, seq: &mut [T], rng: &mut R) -> Result<(), R::Error>
    where
        R: TryRandomSource + ?Sized,
    {
        self.walk(seq, 0, rng)
    }

    /// Fixes `amount` trailing positions with a uniform random ordered sample
    /// of `seq` and returns `(sample, rest)`.
    ///
    /// `rest` holds the remaining elements in unspecified order. An `amount`
    /// of at least `seq.len()` shuffles the whole slice.
    pub fn partial_shuffle<'a, T, R>(
        &mut self,
        seq: &'a mut [T],
        amount: usize,
        rng: &mut R,
    ) -> (&'a mut [T], &'a mut [T])
    where
        R: RandomSource + ?Sized,
    {
        into_ok(self.try_partial_shuffle(seq, amount, &mut Total(rng)))
    }

    /// Fallible form of [`Shuffler::partial_shuffle`].
    ///
    /// # Errors
    /// Returns the source's error as soon as a draw fails.
    pub fn try_partial_shuffle<'a, T, R>(
        &mut self,
        seq: &'a mut [T],
        amount: usize,
        rng: &mut R,
    ) -> Result<(&'a mut [T], &'a mut [T]), R::Error>
    where
        R: TryRandomSource + ?Sized,
    {
        let stop = seq.len().saturating_sub(amount);
        self.walk(seq, stop, rng)?;
        let (rest, sample) = seq.split_at_mut(stop);
        Ok((sample, rest))
    }

    /// Counters accumulated since construction or the last reset.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> ShuffleStats {
        self.stats
    }

    #[cfg(feature = "stats")]
    pub fn reset_stats(&mut self) {
        self.stats = ShuffleStats::default();
    }

    #[cfg(feature = "stats")]
    fn walk<T, R>(&mut self, seq: &mut [T], stop: usize, rng: &mut R) -> Result<(), R::Error>
    where
        R: TryRandomSource + ?Sized,
    {
        let mut counted = CountingSource::new(rng);
        let result = self.walk_inner(seq, stop, &mut counted);
        sat_add_u64(&mut self.stats.draws, counted.draws());
        if result.is_ok() {
            sat_add_u64(&mut self.stats.shuffles, 1);
        }
        result
    }

    #[cfg(not(feature = "stats"))]
    #[inline]
    fn walk<T, R>(&mut self, seq: &mut [T], stop: usize, rng: &mut R) -> Result<(), R::Error>
    where
        R: TryRandomSource + ?Sized,
    {
        self.walk_inner(seq, stop, rng)
    }

    /// Walks `n` from `seq.len()` down to `max(stop, 1)`.
    fn walk_inner<T, R>(&mut self, seq: &mut [T], stop: usize, rng: &mut R) -> Result<(), R::Error>
    where
        R: TryRandomSource + ?Sized,
    {
        let stop = stop as u64;
        let mut n = seq.len() as u64;

        for regime in self.schedule.regimes() {
            let mut bound = regime.starting_bound(n);
            while n > regime.floor && n > stop {
                let k = (regime.batch as u64).min(n - stop) as usize;
                bound = try_generate_batch(n, k, bound, rng, &mut self.batch)?;
                swap_batch(seq, n, &self.batch);
                n -= k as u64;
                #[cfg(feature = "stats")]
                sat_add_u64(&mut self.stats.batches, 1);
            }
        }

        if n > 1 && n > stop {
            let k = (n - 1).min(n - stop) as usize;
            try_generate_batch(n, k, self.schedule.tail_bound(), rng, &mut self.batch)?;
            swap_batch(seq, n, &self.batch);
            #[cfg(feature = "stats")]
            sat_add_u64(&mut self.stats.batches, 1);
        }
        Ok(())
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new(BatchSchedule::reference())
    }
}

/// Applies one batch: position `n-1-i` takes the element at `batch[i]`.
#[inline(always)]
fn swap_batch<T>(seq: &mut [T], n: u64, batch: &IndexBatch) {
    let top = n as usize - 1;
    for (i, &index) in batch.iter().enumerate() {
        seq.swap(top - i, index as usize);
    }
}

/// Permutes `seq` uniformly at random using the reference schedule.
///
/// # Examples
/// ```
/// use batch_shuffle::{shuffle, XorShift64};
///
/// let mut items = [0, 1, 2, 3, 4, 5];
/// shuffle(&mut items, &mut XorShift64::new(0x0123_4567_89AB_CDEF));
/// assert_eq!(items, [0, 4, 3, 5, 2, 1]);
/// ```
pub fn shuffle<T, R>(seq: &mut [T], rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    Shuffler::default().shuffle(seq, rng)
}

/// Fallible form of [`shuffle`].
///
/// # Errors
/// Returns the source's error unchanged; see [`Shuffler::try_shuffle`].
pub fn try_shuffle<T, R>(seq: &mut [T], rng: &mut R) -> Result<(), R::Error>
where
    R: TryRandomSource + ?Sized,
{
    Shuffler::default().try_shuffle(seq, rng)
}

/// Uniform random ordered sample of `amount` elements moved to the end of
/// `seq`; returns `(sample, rest)`.
pub fn partial_shuffle<'a, T, R>(
    seq: &'a mut [T],
    amount: usize,
    rng: &mut R,
) -> (&'a mut [T], &'a mut [T])
where
    R: RandomSource + ?Sized,
{
    Shuffler::default().partial_shuffle(seq, amount, rng)
}
