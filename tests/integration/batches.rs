//! Per-position uniformity of single batches at the edges of each regime.
//!
//! Every index of a batch is bucketed into 16 equal-probability bins scaled
//! to its own range; any position whose histogram fails a chi-squared test
//! (df = 15, about the 0.05% level) fails the test.

use batch_shuffle::batch::MAX_LEN_FOR_BATCH;
use batch_shuffle::{generate_batch, IndexBatch, XorShift64};

const BUCKETS: u64 = 16;
const TRIALS: u64 = 32_000;
const CRITICAL_DF15: f64 = 39.91;

/// Share of `[0, range)` that lands in `bucket` under `x * 16 / range`.
fn bucket_weight(range: u64, bucket: u64) -> f64 {
    let m = range as u128;
    let b = bucket as u128;
    let lo = (b * m + 15) / 16;
    let hi = ((b + 1) * m + 15) / 16;
    (hi - lo) as f64 / range as f64
}

/// Worst per-position chi-squared over `TRIALS` batches of `k` from `n`.
fn worst_position(n: u64, k: usize, seed: u64) -> f64 {
    let mut counts = vec![[0u64; BUCKETS as usize]; k];
    let mut rng = XorShift64::new(seed);
    let mut batch = IndexBatch::new();
    let mut bound = u64::MAX;
    for _ in 0..TRIALS {
        bound = generate_batch(n, k, bound, &mut rng, &mut batch);
        for (i, &index) in batch.iter().enumerate() {
            let range = n - i as u64;
            assert!(index < range, "index {index} out of range {range}");
            let bucket = (index as u128 * BUCKETS as u128 / range as u128) as usize;
            counts[i][bucket] += 1;
        }
    }

    let mut worst = 0.0f64;
    for (i, row) in counts.iter().enumerate() {
        let range = n - i as u64;
        let chi2: f64 = row
            .iter()
            .enumerate()
            .map(|(b, &c)| {
                let expected = bucket_weight(range, b as u64) * TRIALS as f64;
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        worst = worst.max(chi2);
    }
    worst
}

#[test]
fn regime_ceilings_are_uniform() {
    let ceilings = [
        (1usize, (1u64 << 63) + 1),
        (2, 1 << 30),
        (3, 1 << 19),
        (4, 1 << 14),
        (5, 1 << 11),
        (6, 1 << 9),
    ];
    for (k, n) in ceilings {
        let chi2 = worst_position(n, k, 0xBA7C_0000 + k as u64);
        assert!(chi2 < CRITICAL_DF15, "k={k} n={n}: chi2 {chi2:.2}");
    }
}

#[test]
fn overflow_limits_are_uniform() {
    for k in 2..=6 {
        let n = MAX_LEN_FOR_BATCH[k];
        let chi2 = worst_position(n, k, 0xED6E_0000 + k as u64);
        assert!(chi2 < CRITICAL_DF15, "k={k} n={n}: chi2 {chi2:.2}");
    }
}

#[test]
fn overflow_table_is_tight() {
    use batch_shuffle::batch::falling_product;
    for k in 2..=6 {
        let n = MAX_LEN_FOR_BATCH[k];
        assert!(falling_product(n, k).is_some(), "k={k}");
        assert!(falling_product(n + 1, k).is_none(), "k={k}");
    }
}
