//! Per-metric min/max normalization.
//!
//! The range is computed over the strictly-positive values only. Zero (and
//! negative) values still get an output, and it is always `0`.
//!
//! When the positive range is degenerate (empty, or a single distinct value),
//! every positive value maps to `1`. Negative values map to `0` in that case
//! too: a pool with a negative metric never scores above one with a zero, so
//! `[-5, 2]` normalizes to `[0, 1]` rather than `[1, 1]`.

use crate::domain::{Metric, PoolRecord};

/// Normalize one metric column to `[0, 1]`.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let range = positive_range(values);

    values
        .iter()
        .map(|&v| {
            if !(v > 0.0) {
                return 0.0;
            }
            match range {
                Some((min, max)) if max != min => (v - min) / (max - min),
                _ => 1.0,
            }
        })
        .collect()
}

/// Normalize all six metrics for `pools`, one row per pool.
///
/// Callers pass only the pools that take part in scoring; every column is
/// normalized independently across that set.
pub fn normalize_metrics(pools: &[PoolRecord]) -> Vec<[f64; 6]> {
    let mut rows = vec![[0.0; 6]; pools.len()];

    for metric in Metric::ALL {
        let column: Vec<f64> = pools.iter().map(|p| p.metric(metric)).collect();
        for (row, value) in rows.iter_mut().zip(normalize(&column)) {
            row[metric.index()] = value;
        }
    }

    rows
}

fn positive_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn distinct_values_span_zero_to_one() {
        let out = normalize(&[50.0, 100.0, 75.0]);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 1.0);
        assert_abs_diff_eq!(out[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zeros_stay_zero_next_to_a_positive_range() {
        let out = normalize(&[0.0, 10.0, 20.0]);
        assert_eq!(out, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn all_zero_column_maps_to_zero() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_positive_value_maps_to_one() {
        assert_eq!(normalize(&[7.0, 0.0, 7.0, 0.0]), vec![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(normalize(&[3.0]), vec![1.0]);
    }

    #[test]
    fn negatives_map_to_zero() {
        // Degenerate positive range: only the positive value maps to 1.
        assert_eq!(normalize(&[-5.0, 2.0]), vec![0.0, 1.0]);
        assert_eq!(normalize(&[-5.0, 2.0, 2.0]), vec![0.0, 1.0, 1.0]);
        assert_eq!(normalize(&[-5.0, 2.0, 4.0]), vec![0.0, 0.0, 1.0]);
        assert_eq!(normalize(&[-1.0, -2.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn empty_column_is_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn metrics_are_normalized_independently() {
        let pools = vec![
            PoolRecord::from_metrics("a", "A", 100.0, 10.0, 50.0, 5.0),
            PoolRecord::from_metrics("b", "B", 50.0, 10.0, 0.0, 2.0),
        ];
        let rows = normalize_metrics(&pools);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][Metric::Tvl.index()], 1.0);
        assert_eq!(rows[1][Metric::Tvl.index()], 0.0);
        // Equal fees: degenerate range.
        assert_eq!(rows[0][Metric::Fees.index()], 1.0);
        assert_eq!(rows[1][Metric::Fees.index()], 1.0);
        // B has no volume.
        assert_eq!(rows[0][Metric::Volume.index()], 1.0);
        assert_eq!(rows[1][Metric::Volume.index()], 0.0);
        // rewards/tvl: A = 0.05, B = 0.04.
        assert_eq!(rows[0][Metric::RewardsToTvl.index()], 1.0);
        assert_eq!(rows[1][Metric::RewardsToTvl.index()], 0.0);
    }
}
