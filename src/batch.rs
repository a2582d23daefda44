//! Batched bounded-integer generation with exact rejection.
//!
//! Purpose: draw `k` indices, uniform over the shrinking ranges
//! `[0, n), [0, n-1), ..., [0, n-k+1)`, from a single 64-bit word.
//!
//! Algorithm:
//! 1. Draw `r`. For `i in 0..k`, split `r * (n - i)` into `(hi, lo)`; `hi` is
//!    index `i` and `lo` becomes the next `r`.
//! 2. After the chain, `lo == r0 * P mod 2^64` with `P = n·(n-1)·…·(n-k+1)`,
//!    and the indices are the mixed-radix digits of `floor(r0 * P / 2^64)`.
//! 3. The digits are biased only when `lo < 2^64 mod P`. Rejecting exactly
//!    those draws leaves every joint outcome with the same number of
//!    preimages, so the batch matches `k` sequential unbiased draws.
//!
//! Invariants:
//! - `1 <= k <= MAX_BATCH` and `k <= n`.
//! - `n <= MAX_LEN_FOR_BATCH[k]`, so `P` fits in 64 bits.
//! - The `bound` passed in is at least `P`. Any earlier bound returned for a
//!   larger `n` (or a larger `k`) in the same walk qualifies.
//!
//! Design notes:
//! - `2^64 mod P` costs a division. The fast path compares `lo` against the
//!   caller's over-estimate `bound` and skips the exact threshold entirely;
//!   since `2^64 mod P < P <= bound`, every draw it accepts is unbiased.
//! - The exact `P` is returned as the new bound so later batches in the same
//!   regime reuse it instead of the coarser starting estimate.
//!
//! References:
//! - Brackett-Rozinsky, Lemire, "Batched Ranged Random Integer Generation"
//!   (Software: Practice and Experience, 2024).

use crate::rng::{into_ok, RandomSource, Total, TryRandomSource};
use crate::stdx::{extract_one, IndexBatch, MAX_BATCH};

/// Largest `n` for which `n·(n-1)·…·(n-k+1)` fits in a `u64`, indexed by `k`.
///
/// Entry 0 is unused; a batch of zero is a programming error.
pub const MAX_LEN_FOR_BATCH: [u64; MAX_BATCH + 1] = [
    0,
    u64::MAX,
    4_294_967_296,
    2_642_246,
    65_537,
    7_133,
    1_627,
];

/// `n·(n-1)·…·(n-k+1)`, or `None` if it overflows 64 bits.
///
/// `k == 0` yields the empty product 1; `n < k` yields 0.
pub fn falling_product(n: u64, k: usize) -> Option<u64> {
    (0..k as u64).try_fold(1u64, |acc, i| acc.checked_mul(n.checked_sub(i)?))
}

/// `2^64 mod bound`: the number of low words that make a multiply-high
/// extraction over `bound` biased.
///
/// Zero for powers of two.
#[inline]
pub fn rejection_threshold(bound: u64) -> u64 {
    debug_assert!(bound > 0, "bound must be > 0");
    bound.wrapping_neg() % bound
}

/// Runs the chained extraction for one draw and returns the final leftover.
#[inline(always)]
fn chain(mut word: u64, n: u64, slots: &mut [u64]) -> u64 {
    for (i, slot) in slots.iter_mut().enumerate() {
        let (hi, lo) = extract_one(word, n - i as u64);
        *slot = hi;
        word = lo;
    }
    word
}

/// Fills `batch` with `k` indices for the ranges `n, n-1, ..., n-k+1` and
/// returns the bound to carry into the next call.
///
/// Draws exactly one word unless the fast path fails and the word falls in
/// the biased region, in which case it re-draws until it does not.
///
/// # Panics
/// - `k == 0` or `k > MAX_BATCH`.
/// - `k > n`.
/// - `n > MAX_LEN_FOR_BATCH[k]` (the product would overflow).
///
/// # Errors
/// Returns the source's error unchanged if a draw fails. `batch` contents are
/// unspecified in that case.
pub fn try_generate_batch<R>(
    n: u64,
    k: usize,
    bound: u64,
    rng: &mut R,
    batch: &mut IndexBatch,
) -> Result<u64, R::Error>
where
    R: TryRandomSource + ?Sized,
{
    assert!(
        (1..=MAX_BATCH).contains(&k),
        "batch size {k} out of range 1..={MAX_BATCH}"
    );
    assert!(k as u64 <= n, "batch size {k} exceeds remaining length {n}");
    assert!(
        n <= MAX_LEN_FOR_BATCH[k],
        "{k}-fold product from length {n} overflows 64 bits"
    );
    debug_assert!(
        falling_product(n, k).is_some_and(|exact| bound >= exact),
        "bound {bound} is below the exact product for n={n}, k={k}"
    );

    let slots = batch.reset(k);
    let mut leftover = chain(rng.try_next_u64()?, n, slots);
    if leftover >= bound {
        return Ok(bound);
    }

    // Cannot overflow: n is within MAX_LEN_FOR_BATCH[k].
    let exact = (1..k as u64).fold(n, |acc, i| acc * (n - i));
    let threshold = rejection_threshold(exact);
    while leftover < threshold {
        leftover = chain(rng.try_next_u64()?, n, slots);
    }
    Ok(exact)
}

/// Infallible form of [`try_generate_batch`].
///
/// # Examples
/// ```
/// use batch_shuffle::batch::generate_batch;
/// use batch_shuffle::rng::XorShift64;
/// use batch_shuffle::stdx::IndexBatch;
///
/// let mut rng = XorShift64::new(7);
/// let mut batch = IndexBatch::new();
/// let bound = generate_batch(10, 3, 10 * 9 * 8, &mut rng, &mut batch);
/// assert!(bound >= 720);
/// assert!(batch[0] < 10 && batch[1] < 9 && batch[2] < 8);
/// ```
#[inline]
pub fn generate_batch<R>(
    n: u64,
    k: usize,
    bound: u64,
    rng: &mut R,
    batch: &mut IndexBatch,
) -> u64
where
    R: RandomSource + ?Sized,
{
    into_ok(try_generate_batch(n, k, bound, &mut Total(rng), batch))
}

/// One unbiased integer in `[0, range)`.
///
/// This is Lemire's nearly-divisionless method: a batch of one whose
/// starting bound is `range` itself, so the division only runs when the
/// leftover lands below `range`.
///
/// # Panics
/// Panics if `range == 0`.
pub fn bounded_u64<R: RandomSource + ?Sized>(range: u64, rng: &mut R) -> u64 {
    let mut batch = IndexBatch::new();
    generate_batch(range, 1, range, rng, &mut batch);
    batch[0]
}
