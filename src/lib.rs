//! Unbiased, division-avoiding in-place shuffling.
//!
//! ## Scope
//! This crate permutes a slice uniformly at random while taking as few words
//! from a 64-bit random source as it can. Several Fisher-Yates indices are
//! extracted from one word by chaining multiply-high reductions, and a
//! rejection step keeps the joint distribution exactly uniform.
//!
//! ## Key invariants
//! - Output is exactly uniform over all `n!` orderings, given a uniform
//!   source.
//! - For batch size `k` at length `n`, `n·(n-1)·…·(n-k+1)` always fits in
//!   64 bits; schedules are validated up front and the generator asserts it.
//! - No division on the common path; `2^64 mod P` is computed only when a
//!   draw's leftover falls below the current bound.
//! - No allocation while shuffling: index scratch is a fixed array.
//!
//! ## Flow
//! `shuffle -> Shuffler (regime walk) -> batch::generate_batch -> stdx::extract_one -> RandomSource`
//!
//! ## Notable entry points
//! - [`shuffle`], [`try_shuffle`], [`partial_shuffle`]: one-shot calls with the
//!   reference schedule.
//! - [`Shuffler`]: reusable driver over a custom [`BatchSchedule`].
//! - [`ScheduleConfig`]: serde-facing schedule description, validated by
//!   [`ScheduleConfig::compile`].
//! - [`batch::generate_batch`], [`batch::bounded_u64`]: the underlying
//!   bounded-integer primitives.
//! - [`RandomSource`] / [`TryRandomSource`]: the consumed capability.
//!
//! ## Feature flags
//! - `stats`: `Shuffler` counts batches, draws and rejections.

pub mod batch;
pub mod error;
pub mod rng;
pub mod schedule;
pub mod shuffle;
#[cfg(feature = "stats")]
pub mod stats;
pub mod stdx;

pub use batch::{bounded_u64, generate_batch, try_generate_batch};
pub use error::ScheduleError;
pub use rng::{from_fn, CountingSource, FromFn, RandomSource, TryRandomSource, XorShift64};
pub use schedule::{BatchSchedule, Regime, RegimeSpec, ScheduleConfig};
pub use shuffle::{partial_shuffle, shuffle, try_shuffle, Shuffler};
#[cfg(feature = "stats")]
pub use stats::ShuffleStats;
pub use stdx::{IndexBatch, MAX_BATCH};
