//! Generated schedules: every valid configuration compiles, survives a JSON
//! round trip, and every broken one is rejected.

use proptest::prelude::*;

use batch_shuffle::batch::{falling_product, MAX_LEN_FOR_BATCH};
use batch_shuffle::schedule::{MAX_REGIMES, MAX_TAIL_FLOOR};
use batch_shuffle::{BatchSchedule, RegimeSpec, ScheduleConfig, ScheduleError, MAX_BATCH};

/// Builds a valid config from raw floors and batch pickers.
///
/// Floors are sorted descending and deduplicated; `tail` becomes the last
/// floor. Each regime picks among the batch sizes its ceiling and floor
/// allow, so the first regime (ceiling `u64::MAX`) is always single-step.
fn build_config(mut floors: Vec<u64>, tail: u64, pickers: Vec<u8>) -> ScheduleConfig {
    floors.sort_unstable_by(|a, b| b.cmp(a));
    floors.dedup();
    floors.truncate(MAX_REGIMES - 1);
    floors.push(tail);

    let mut regimes = Vec::with_capacity(floors.len());
    let mut ceiling = u64::MAX;
    for (i, &floor) in floors.iter().enumerate() {
        let allowed: Vec<usize> = (1..=MAX_BATCH)
            .filter(|&k| ceiling <= MAX_LEN_FOR_BATCH[k] && floor >= (k as u64 - 1).max(1))
            .collect();
        let pick = pickers.get(i).copied().unwrap_or(0) as usize;
        regimes.push(RegimeSpec {
            batch: allowed[pick % allowed.len()],
            floor,
        });
        ceiling = floor;
    }
    ScheduleConfig { regimes }
}

/// Valid configs whose floors stay small enough to matter for short slices.
pub fn small_config() -> impl Strategy<Value = ScheduleConfig> {
    (
        prop::collection::vec(8u64..4096, 0..6),
        1u64..=MAX_TAIL_FLOOR,
        prop::collection::vec(any::<u8>(), MAX_REGIMES),
    )
        .prop_map(|(floors, tail, pickers)| build_config(floors, tail, pickers))
}

fn wide_config() -> impl Strategy<Value = ScheduleConfig> {
    (
        prop::collection::vec(8u64..u64::MAX, 0..8),
        1u64..=MAX_TAIL_FLOOR,
        prop::collection::vec(any::<u8>(), MAX_REGIMES),
    )
        .prop_map(|(floors, tail, pickers)| build_config(floors, tail, pickers))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn generated_configs_compile(config in wide_config()) {
        let schedule = config.compile().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(schedule.regimes().len(), config.regimes.len());

        let mut ceiling = u64::MAX;
        for (regime, spec) in schedule.regimes().iter().zip(&config.regimes) {
            prop_assert_eq!(regime.batch(), spec.batch);
            prop_assert_eq!(regime.floor(), spec.floor);
            let exact = falling_product(ceiling, spec.batch).unwrap();
            prop_assert!(regime.seed_bound() >= exact);
            ceiling = spec.floor;
        }
        let tail: u64 = (2..=schedule.tail_floor()).product();
        prop_assert_eq!(schedule.tail_bound(), tail);
    }

    #[test]
    fn configs_round_trip_through_json(config in wide_config()) {
        let json = serde_json::to_string(&config).unwrap();
        let back: ScheduleConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&back, &config);
        prop_assert_eq!(
            BatchSchedule::try_from(&back).unwrap(),
            config.compile().unwrap()
        );
    }

    #[test]
    fn repeated_floor_is_rejected(config in wide_config()) {
        prop_assume!(config.regimes.len() >= 2);
        let mut broken = config.clone();
        let last = broken.regimes.len() - 1;
        let floor = broken.regimes[last - 1].floor;
        broken.regimes[last].floor = floor;
        let err = broken.compile().unwrap_err();
        let is_not_descending = matches!(err, ScheduleError::FloorsNotDescending { .. });
        prop_assert!(is_not_descending, "{}", err);
    }

    #[test]
    fn oversized_tail_is_rejected(floor in (MAX_TAIL_FLOOR + 1)..1_000_000) {
        let config = ScheduleConfig {
            regimes: vec![RegimeSpec { batch: 1, floor }],
        };
        prop_assert_eq!(
            config.compile(),
            Err(ScheduleError::TailTooLarge { floor, max: MAX_TAIL_FLOOR })
        );
    }
}
