//! # Random Sources
//!
//! The shuffle core never owns a generator. Every call receives an explicit
//! source handle, which keeps tests deterministic and lets callers decide on
//! statistical quality.
//!
//! ## Capabilities
//!
//! - [`RandomSource`]: an infallible stream of uniform `u64` words.
//! - [`TryRandomSource`]: a stream that may fail (hardware entropy, a
//!   replay log that runs dry). Errors propagate unchanged to the caller of
//!   `try_shuffle`; the core never retries a failed draw.
//!
//! Every source in this module, and `Box<R>` over any [`RandomSource`], is
//! also a `TryRandomSource<Error = Infallible>`. A blanket impl would
//! collide with the `&mut R` forwarding impl, so third-party infallible
//! sources get the same treatment by wrapping them in [`from_fn`].
//!
//! ## Provided sources
//!
//! **[`XorShift64`]**: tiny deterministic generator for tests, benchmarks
//! and reproducible runs. Not suitable for anything adversarial.
//!
//! **[`FromFn`]**: adapts a closure, e.g. around another crate's generator.
//!
//! **[`CountingSource`]**: forwards to an inner source and counts draws.
//!
//! **No `Copy`**: copying a generator duplicates its stream, producing
//! identical "random" shuffles. Use `Clone` explicitly when that is wanted.

use std::convert::Infallible;

/// A uniform 64-bit random source.
///
/// Implementations must return independent, uniformly distributed words; the
/// shuffle is exactly unbiased only under that assumption.
pub trait RandomSource {
    /// Returns the next uniform 64-bit word.
    fn next_u64(&mut self) -> u64;
}

/// A uniform 64-bit random source that may fail.
pub trait TryRandomSource {
    /// Error reported when no word can be produced.
    type Error;

    /// Returns the next uniform 64-bit word, or the source's error.
    fn try_next_u64(&mut self) -> Result<u64, Self::Error>;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

impl<R: RandomSource + ?Sized> TryRandomSource for Box<R> {
    type Error = Infallible;

    #[inline(always)]
    fn try_next_u64(&mut self) -> Result<u64, Infallible> {
        Ok((**self).next_u64())
    }
}

impl<R: TryRandomSource + ?Sized> TryRandomSource for &mut R {
    type Error = R::Error;

    #[inline(always)]
    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        (**self).try_next_u64()
    }
}

/// Lifts an infallible source into the fallible interface the core is
/// written against.
pub(crate) struct Total<'a, R: ?Sized>(pub(crate) &'a mut R);

impl<R: RandomSource + ?Sized> TryRandomSource for Total<'_, R> {
    type Error = Infallible;

    #[inline(always)]
    fn try_next_u64(&mut self) -> Result<u64, Infallible> {
        Ok(self.0.next_u64())
    }
}

/// Unwraps a result whose error type is uninhabited.
#[inline(always)]
pub(crate) fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Deterministic XorShift64 generator.
///
/// # Thread Safety
///
/// NOT thread-safe. Give each thread its own instance, typically forked
/// from a master seed with [`XorShift64::fork`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new generator with the given seed.
    ///
    /// Seed 0 is mapped to a non-zero value to avoid the all-zero lockup state.
    #[inline]
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Current state, for checkpointing.
    ///
    /// `XorShift64::new(rng.state())` resumes the exact stream.
    #[inline]
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Forks a new generator seeded from this one.
    ///
    /// The raw output is passed through splitmix64 so parent and child
    /// streams are not trivially correlated.
    pub fn fork(&mut self) -> Self {
        let raw_seed = self.next_u64();
        Self::new(splitmix64(raw_seed))
    }
}

impl RandomSource for XorShift64 {
    /// Marsaglia's (13, 7, 17) triple; full period of `2^64 - 1`.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl TryRandomSource for XorShift64 {
    type Error = Infallible;

    #[inline(always)]
    fn try_next_u64(&mut self) -> Result<u64, Infallible> {
        Ok(self.next_u64())
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(0)
    }
}

/// SplitMix64 finalizer (Vigna, 2017). Each input bit affects roughly half
/// of the output bits.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Source backed by a closure. Built with [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

/// Wraps `f` as a [`RandomSource`].
///
/// # Examples
/// ```
/// use batch_shuffle::rng::{from_fn, RandomSource};
///
/// let mut counter = 0u64;
/// let mut source = from_fn(move || {
///     counter += 1;
///     counter << 60
/// });
/// assert_eq!(source.next_u64(), 1 << 60);
/// ```
pub fn from_fn<F: FnMut() -> u64>(f: F) -> FromFn<F> {
    FromFn { f }
}

impl<F: FnMut() -> u64> RandomSource for FromFn<F> {
    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        (self.f)()
    }
}

impl<F: FnMut() -> u64> TryRandomSource for FromFn<F> {
    type Error = Infallible;

    #[inline(always)]
    fn try_next_u64(&mut self) -> Result<u64, Infallible> {
        Ok((self.f)())
    }
}

/// Forwards to an inner source and counts successful draws.
#[derive(Clone, Debug, Default)]
pub struct CountingSource<R> {
    inner: R,
    draws: u64,
}

impl<R> CountingSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, draws: 0 }
    }

    /// Number of words handed out so far.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: RandomSource> RandomSource for CountingSource<R> {
    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }
}

impl<R: TryRandomSource> TryRandomSource for CountingSource<R> {
    type Error = R::Error;

    #[inline(always)]
    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        let word = self.inner.try_next_u64()?;
        self.draws += 1;
        Ok(word)
    }
}
