//! Batch-size schedules: which `k` to use at each remaining length.
//!
//! A schedule is an ordered list of regimes. Regime `i` uses batch size
//! `batch` while the remaining length `n` is above its `floor`; the first
//! regime starts at the full sequence length and each later regime picks up
//! where the previous floor left off. Whatever remains at or below the last
//! floor (the tail) is finished with a single batch of size `n - 1`.
//!
//! # Invariants (checked by [`ScheduleConfig::compile`])
//! - Floors strictly decrease; the first regime's ceiling is `u64::MAX`.
//! - For each regime, `batch` consecutive lengths down from its ceiling
//!   multiply without overflowing 64 bits.
//! - `floor >= max(batch - 1, 1)`, so every step has `n >= batch` and
//!   lengths 0 and 1 never draw.
//! - The last floor is at most `MAX_TAIL_FLOOR`, so the tail fits one batch.
//!
//! # Design Notes
//! - Thresholds are a speed trade-off only. Any schedule passing the checks
//!   gives an exactly unbiased shuffle.
//! - [`ScheduleConfig`] is the serde-facing form; [`BatchSchedule`] is the
//!   validated, fixed-capacity form the shuffle loop reads, and is `Copy`.

use serde::{Deserialize, Serialize};

use crate::batch::{falling_product, MAX_LEN_FOR_BATCH};
use crate::error::ScheduleError;
use crate::stdx::MAX_BATCH;

/// Maximum number of regimes in a compiled schedule.
pub const MAX_REGIMES: usize = 8;

/// Largest last-regime floor whose tail still fits one batch.
pub const MAX_TAIL_FLOOR: u64 = MAX_BATCH as u64 + 1;

/// One regime as written in a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegimeSpec {
    /// Indices drawn per random word.
    pub batch: usize,
    /// Exclusive lower length; the regime runs while `n > floor`.
    pub floor: u64,
}

/// User-facing schedule description.
///
/// `Default` is the reference schedule tuned for 64-bit multiply-high:
///
/// | `n` | batch |
/// |-----|-------|
/// | `> 2^30` | 1 |
/// | `2^19 < n <= 2^30` | 2 |
/// | `2^14 < n <= 2^19` | 3 |
/// | `2^11 < n <= 2^14` | 4 |
/// | `2^9 < n <= 2^11` | 5 |
/// | `6 < n <= 2^9` | 6 |
/// | `2 <= n <= 6` | `n - 1` (tail) |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    pub regimes: Vec<RegimeSpec>,
}

impl ScheduleConfig {
    /// The reference schedule.
    pub fn reference() -> Self {
        Self {
            regimes: vec![
                RegimeSpec { batch: 1, floor: 1 << 30 },
                RegimeSpec { batch: 2, floor: 1 << 19 },
                RegimeSpec { batch: 3, floor: 1 << 14 },
                RegimeSpec { batch: 4, floor: 1 << 11 },
                RegimeSpec { batch: 5, floor: 1 << 9 },
                RegimeSpec { batch: 6, floor: 6 },
            ],
        }
    }

    /// One index per draw all the way down (classic Fisher-Yates).
    pub fn single_step() -> Self {
        Self {
            regimes: vec![RegimeSpec { batch: 1, floor: 1 }],
        }
    }

    /// Validates the configuration and precomputes per-regime seed bounds.
    ///
    /// # Errors
    /// Returns the first violated invariant, scanning regimes in order.
    pub fn compile(&self) -> Result<BatchSchedule, ScheduleError> {
        let count = self.regimes.len();
        if count == 0 {
            return Err(ScheduleError::Empty);
        }
        if count > MAX_REGIMES {
            return Err(ScheduleError::TooManyRegimes {
                count,
                max: MAX_REGIMES,
            });
        }

        let mut regimes = [Regime::UNUSED; MAX_REGIMES];
        let mut ceiling = u64::MAX;
        for (index, spec) in self.regimes.iter().enumerate() {
            let RegimeSpec { batch, floor } = *spec;
            if !(1..=MAX_BATCH).contains(&batch) {
                return Err(ScheduleError::BatchOutOfRange {
                    index,
                    batch,
                    max: MAX_BATCH,
                });
            }
            if floor >= ceiling {
                return Err(ScheduleError::FloorsNotDescending {
                    index,
                    floor,
                    previous: ceiling,
                });
            }
            let max_len = MAX_LEN_FOR_BATCH[batch];
            if ceiling > max_len {
                return Err(ScheduleError::ProductOverflow {
                    index,
                    batch,
                    ceiling,
                    max_len,
                });
            }
            if floor < (batch as u64 - 1).max(1) {
                return Err(ScheduleError::FloorBelowBatch {
                    index,
                    batch,
                    floor,
                });
            }

            // Round up to a power of two: any over-estimate of the exact
            // product is a valid starting bound for the whole regime.
            let seed_bound = falling_product(ceiling, batch)
                .and_then(u64::checked_next_power_of_two)
                .unwrap_or(u64::MAX);
            regimes[index] = Regime {
                batch,
                floor,
                seed_bound,
            };
            ceiling = floor;
        }

        if ceiling > MAX_TAIL_FLOOR {
            return Err(ScheduleError::TailTooLarge {
                floor: ceiling,
                max: MAX_TAIL_FLOOR,
            });
        }

        Ok(BatchSchedule {
            regimes,
            len: count,
            tail_bound: tail_bound(ceiling),
        })
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// `floor!`, the largest product a tail batch can see.
fn tail_bound(floor: u64) -> u64 {
    (2..=floor).product()
}

/// A validated regime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Regime {
    pub(crate) batch: usize,
    pub(crate) floor: u64,
    pub(crate) seed_bound: u64,
}

impl Regime {
    const UNUSED: Self = Self {
        batch: 0,
        floor: 0,
        seed_bound: 0,
    };

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn floor(&self) -> u64 {
        self.floor
    }

    /// Over-estimate of every batch product in this regime: the product at
    /// the ceiling rounded up to a power of two, or `u64::MAX` when that
    /// does not fit.
    pub fn seed_bound(&self) -> u64 {
        self.seed_bound
    }

    /// Bound to pass to the first batch at length `n`.
    ///
    /// Single-index regimes start from `n` itself, which is exact; wider
    /// regimes start from the precomputed over-estimate.
    #[inline]
    pub(crate) fn starting_bound(&self, n: u64) -> u64 {
        if self.batch == 1 {
            n
        } else {
            self.seed_bound
        }
    }
}

/// Validated, fixed-capacity schedule consumed by the shuffle loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSchedule {
    // Only `0..len` are meaningful; the rest are `Regime::UNUSED`.
    regimes: [Regime; MAX_REGIMES],
    len: usize,
    tail_bound: u64,
}

impl BatchSchedule {
    /// Compiled form of [`ScheduleConfig::reference`].
    pub const fn reference() -> Self {
        const fn regime(batch: usize, floor: u64, seed_bound: u64) -> Regime {
            Regime {
                batch,
                floor,
                seed_bound,
            }
        }
        Self {
            regimes: [
                regime(1, 1 << 30, u64::MAX),
                regime(2, 1 << 19, 1 << 60),
                regime(3, 1 << 14, 1 << 57),
                regime(4, 1 << 11, 1 << 56),
                regime(5, 1 << 9, 1 << 55),
                regime(6, 6, 1 << 54),
                Regime::UNUSED,
                Regime::UNUSED,
            ],
            len: 6,
            tail_bound: 720,
        }
    }

    /// Compiled form of [`ScheduleConfig::single_step`].
    pub const fn single_step() -> Self {
        let head = Regime {
            batch: 1,
            floor: 1,
            seed_bound: u64::MAX,
        };
        let unused = Regime::UNUSED;
        Self {
            regimes: [head, unused, unused, unused, unused, unused, unused, unused],
            len: 1,
            tail_bound: 1,
        }
    }

    /// Active regimes, in walk order.
    #[inline]
    pub fn regimes(&self) -> &[Regime] {
        &self.regimes[..self.len]
    }

    /// Floor of the last regime; lengths at or below it form the tail.
    #[inline]
    pub fn tail_floor(&self) -> u64 {
        self.regimes[self.len - 1].floor
    }

    /// Starting bound for the tail batch (`tail_floor!`).
    #[inline]
    pub fn tail_bound(&self) -> u64 {
        self.tail_bound
    }
}

impl Default for BatchSchedule {
    fn default() -> Self {
        Self::reference()
    }
}

impl TryFrom<&ScheduleConfig> for BatchSchedule {
    type Error = ScheduleError;

    fn try_from(config: &ScheduleConfig) -> Result<Self, Self::Error> {
        config.compile()
    }
}

impl From<&BatchSchedule> for ScheduleConfig {
    fn from(schedule: &BatchSchedule) -> Self {
        Self {
            regimes: schedule
                .regimes()
                .iter()
                .map(|r| RegimeSpec {
                    batch: r.batch,
                    floor: r.floor,
                })
                .collect(),
        }
    }
}
