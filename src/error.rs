//! Error types for batch schedule validation.
//!
//! The shuffle path itself has no recoverable errors: precondition
//! violations panic and random-source failures propagate as the source's own
//! error type. The only fallible surface is turning a user-supplied
//! [`ScheduleConfig`](crate::ScheduleConfig) into a [`BatchSchedule`](crate::BatchSchedule).
//!
//! The enum is `#[non_exhaustive]`; consumers should include a fallback arm.

use std::fmt;

/// Reasons a schedule configuration is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScheduleError {
    /// The schedule has no regimes.
    Empty,
    /// More regimes than a compiled schedule can hold.
    TooManyRegimes { count: usize, max: usize },
    /// A regime's batch size is zero or above the scratch capacity.
    BatchOutOfRange { index: usize, batch: usize, max: usize },
    /// Floors must strictly decrease from one regime to the next.
    FloorsNotDescending { index: usize, floor: u64, previous: u64 },
    /// The product of `batch` consecutive lengths from the regime's ceiling
    /// does not fit in 64 bits.
    ProductOverflow {
        index: usize,
        batch: usize,
        ceiling: u64,
        max_len: u64,
    },
    /// The floor is zero, or a step at `n = floor + 1` would draw more
    /// indices than there are positions left.
    FloorBelowBatch { index: usize, batch: usize, floor: u64 },
    /// The lengths left after the last regime do not fit in one tail batch.
    TailTooLarge { floor: u64, max: u64 },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "batch schedule has no regimes"),
            Self::TooManyRegimes { count, max } => {
                write!(f, "too many regimes: {count} (max: {max})")
            }
            Self::BatchOutOfRange { index, batch, max } => {
                write!(f, "regime {index}: batch size {batch} out of range 1..={max}")
            }
            Self::FloorsNotDescending {
                index,
                floor,
                previous,
            } => write!(
                f,
                "regime {index}: floor {floor} is not below previous floor {previous}"
            ),
            Self::ProductOverflow {
                index,
                batch,
                ceiling,
                max_len,
            } => write!(
                f,
                "regime {index}: {batch}-fold product from length {ceiling} overflows 64 bits \
                 (max length for this batch: {max_len})"
            ),
            Self::FloorBelowBatch {
                index,
                batch,
                floor,
            } => write!(
                f,
                "regime {index}: floor {floor} too small for batch size {batch} \
                 (need at least {})",
                batch.saturating_sub(1).max(1)
            ),
            Self::TailTooLarge { floor, max } => {
                write!(f, "tail floor {floor} too large for one batch (max: {max})")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}
