//! Shuffle properties under generated schedules.
//!
//! Whatever the schedule, a shuffle must be a permutation, must be a pure
//! function of the source's words, and must never draw for lengths 0 and 1.

use proptest::prelude::*;

use batch_shuffle::{
    partial_shuffle, shuffle, BatchSchedule, CountingSource, Shuffler, XorShift64,
};

use crate::schedules::small_config;

/// Batches a full walk takes under `schedule`, ignoring rejections.
fn batches_for(schedule: &BatchSchedule, len: u64) -> u64 {
    let mut n = len;
    let mut batches = 0;
    for regime in schedule.regimes() {
        while n > regime.floor() {
            n -= (regime.batch() as u64).min(n);
            batches += 1;
        }
    }
    if n > 1 {
        batches += 1;
    }
    batches
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn any_schedule_yields_a_permutation(
        config in small_config(),
        len in 0usize..3000,
        seed in any::<u64>(),
    ) {
        let mut shuffler = Shuffler::new(config.compile().unwrap());
        let mut items: Vec<usize> = (0..len).collect();
        shuffler.shuffle(&mut items, &mut XorShift64::new(seed));
        items.sort_unstable();
        prop_assert!(items.into_iter().eq(0..len));
    }

    #[test]
    fn draws_cover_every_batch(
        config in small_config(),
        len in 0u64..3000,
        seed in any::<u64>(),
    ) {
        let schedule = config.compile().unwrap();
        let mut shuffler = Shuffler::new(schedule);
        let mut rng = CountingSource::new(XorShift64::new(seed));
        let mut items: Vec<u64> = (0..len).collect();
        shuffler.shuffle(&mut items, &mut rng);
        prop_assert!(rng.draws() >= batches_for(&schedule, len));
        if len <= 1 {
            prop_assert_eq!(rng.draws(), 0);
        }
    }

    #[test]
    fn same_words_same_order(
        config in small_config(),
        len in 0usize..2000,
        seed in any::<u64>(),
    ) {
        let schedule = config.compile().unwrap();
        let mut a: Vec<usize> = (0..len).collect();
        let mut b = a.clone();
        let mut reused = Shuffler::new(schedule);
        // A warm-up call must leave no state behind.
        reused.shuffle(&mut [1u8, 2, 3, 4, 5, 6, 7, 8, 9], &mut XorShift64::new(!seed));
        reused.shuffle(&mut a, &mut XorShift64::new(seed));
        Shuffler::new(schedule).shuffle(&mut b, &mut XorShift64::new(seed));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn partial_sample_is_distinct_elements(
        len in 0usize..2000,
        amount in 0usize..2500,
        seed in any::<u64>(),
    ) {
        let mut items: Vec<usize> = (0..len).collect();
        let (sample, rest) = partial_shuffle(&mut items, amount, &mut XorShift64::new(seed));
        prop_assert_eq!(sample.len(), amount.min(len));
        let mut seen = vec![false; len];
        for &x in sample.iter().chain(rest.iter()) {
            prop_assert!(!seen[x], "duplicate {}", x);
            seen[x] = true;
        }
    }

    #[test]
    fn reference_matches_default_config(len in 0usize..1500, seed in any::<u64>()) {
        let compiled = batch_shuffle::ScheduleConfig::default().compile().unwrap();
        prop_assert_eq!(compiled, BatchSchedule::reference());
        let mut a: Vec<usize> = (0..len).collect();
        let mut b = a.clone();
        Shuffler::new(compiled).shuffle(&mut a, &mut XorShift64::new(seed));
        shuffle(&mut b, &mut XorShift64::new(seed));
        prop_assert_eq!(a, b);
    }
}
