//! Bounded integer extraction via multiply-high.
//!
//! Purpose: map a 64-bit word into `[0, range)` without division, and keep the
//! low half of the product so callers can chain further extractions or test
//! for bias.
//!
//! Invariants:
//! - Callers must pass `range > 0`.
//! - `value < range` for every `draw`.
//! - `leftover` is the fractional position of `draw` inside the bucket that
//!   produced `value`, scaled to 64 bits.
//!
//! Algorithm:
//! - Compute `(draw as u128) * (range as u128)`; the high 64 bits are the
//!   value, the low 64 bits are the leftover.
//!
//! Design notes:
//! - For uniform input the value is biased by at most `range / 2^64`. The
//!   batch generator removes that bias by rejecting on the leftover.
//! - For `range` a power of two the value is exactly the top `log2(range)`
//!   bits of `draw`, and the leftover is `draw` shifted left by the same
//!   amount.
//! - Feeding `leftover` into a second extraction over `range2` yields the
//!   same pair as extracting from `draw` over `range * range2` in mixed radix;
//!   this is what makes batching possible.
//!
//! References:
//! - https://lemire.me/blog/2016/06/27/a-fast-alternative-to-the-modulo-reduction/
//! - Lemire, "Fast Random Integer Generation in an Interval" (TOMACS, 2019).

/// Splits `draw * range` into `(value, leftover)`.
///
/// Guarantees:
/// - `value < range` when `range > 0`.
/// - `value * 2^64 + leftover == draw * range`.
///
/// Preconditions:
/// - `range > 0`. This is enforced with a `debug_assert!`.
///
/// # Examples
/// ```
/// use batch_shuffle::stdx::fastrange::extract_one;
///
/// assert_eq!(extract_one(u64::MAX, 8), (7, u64::MAX - 7));
/// assert_eq!(extract_one(1 << 63, 6), (3, 0));
/// ```
#[inline(always)]
pub fn extract_one(draw: u64, range: u64) -> (u64, u64) {
    debug_assert!(range > 0, "range must be > 0");
    let wide = (draw as u128) * (range as u128);
    ((wide >> 64) as u64, wide as u64)
}
