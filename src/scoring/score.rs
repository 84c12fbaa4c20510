//! Weighted scoring and voting-weight shares.

use crate::domain::{Metric, PoolRecord, RewardTotals, ScoredPool, WeightConfig};
use crate::scoring::allocate::allocate;
use crate::scoring::normalize::normalize_metrics;

/// Decimal places kept on scores and shares.
pub const OUTPUT_DECIMALS: i32 = 6;

/// Score every pool and convert scores into voting-weight shares.
///
/// Only participating pools (see [`PoolRecord::participates`]) are normalized
/// and counted in the total; the rest are still returned with zeros so the
/// output lists every input pool, in input order.
///
/// Allocations use the unrounded share so budgets are fully distributed.
pub fn calculate_voting_weights(
    pools: &[PoolRecord],
    weights: &WeightConfig,
    totals: Option<&RewardTotals>,
) -> Vec<ScoredPool> {
    let participants: Vec<usize> = (0..pools.len()).filter(|&i| pools[i].participates()).collect();
    let eligible: Vec<PoolRecord> = participants.iter().map(|&i| pools[i].clone()).collect();

    let normalized = normalize_metrics(&eligible);
    let scores: Vec<f64> = eligible
        .iter()
        .zip(&normalized)
        .map(|(pool, row)| raw_score(row, weights) * pool.weight_multiplier)
        .collect();

    let total: f64 = scores.iter().sum();

    let mut by_pool: Vec<Option<(f64, f64)>> = vec![None; pools.len()];
    for (&idx, &score) in participants.iter().zip(&scores) {
        let share = if total != 0.0 { score / total } else { 0.0 };
        by_pool[idx] = Some((score, share));
    }

    pools
        .iter()
        .zip(by_pool)
        .map(|(pool, hit)| {
            let (score, share) = hit.unwrap_or((0.0, 0.0));
            let (token_allocation, stable_allocation) = allocate(share, totals);
            ScoredPool {
                id: pool.id.clone(),
                symbol: pool.symbol.clone(),
                score: round_to(score, OUTPUT_DECIMALS),
                voting_weight: round_to(share, OUTPUT_DECIMALS),
                token_allocation,
                stable_allocation,
            }
        })
        .collect()
}

/// Linear combination of a normalized metric row with the configured weights.
pub fn raw_score(row: &[f64; 6], weights: &WeightConfig) -> f64 {
    Metric::ALL
        .iter()
        .map(|m| row[m.index()] * weights.weight(*m))
        .sum()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tvl_only() -> WeightConfig {
        WeightConfig {
            tvl: 1.0,
            ..WeightConfig::default()
        }
    }

    #[test]
    fn multiplier_scales_score() {
        let mut a = PoolRecord::from_metrics("a", "A", 100.0, 0.0, 0.0, 1.0);
        let b = PoolRecord::from_metrics("b", "B", 50.0, 0.0, 0.0, 1.0);
        let c = PoolRecord::from_metrics("c", "C", 75.0, 0.0, 0.0, 1.0);
        a.weight_multiplier = 3.0;

        let out = calculate_voting_weights(&[a, b, c], &tvl_only(), None);
        assert_eq!(out[0].score, 3.0);
        assert_eq!(out[1].score, 0.0);
        assert_eq!(out[2].score, 0.5);
        assert_abs_diff_eq!(out[0].voting_weight, 3.0 / 3.5, epsilon = 1e-6);
        assert_abs_diff_eq!(out[2].voting_weight, 0.5 / 3.5, epsilon = 1e-6);
    }

    #[test]
    fn non_participants_are_listed_with_zeros() {
        let a = PoolRecord::from_metrics("a", "A", 100.0, 0.0, 0.0, 1.0);
        let mut off = PoolRecord::from_metrics("off", "OFF", 1_000.0, 0.0, 0.0, 1.0);
        off.bve_enabled = false;
        let totals = RewardTotals {
            token_total: 100.0,
            stable_total: 10.0,
        };

        let out = calculate_voting_weights(&[off, a], &tvl_only(), Some(&totals));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "off");
        assert_eq!(out[0].score, 0.0);
        assert_eq!(out[0].voting_weight, 0.0);
        assert_eq!(out[0].token_allocation, 0.0);
        // A is alone, so its tvl normalizes to 1 and it takes everything.
        assert_eq!(out[1].voting_weight, 1.0);
        assert_eq!(out[1].token_allocation, 100.0);
        assert_eq!(out[1].stable_allocation, 10.0);
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let pools = vec![
            PoolRecord::from_metrics("a", "A", 100.0, 10.0, 50.0, 5.0),
            PoolRecord::from_metrics("b", "B", 50.0, 5.0, 25.0, 2.0),
        ];
        let totals = RewardTotals {
            token_total: 100.0,
            stable_total: 0.0,
        };
        let out = calculate_voting_weights(&pools, &WeightConfig::default(), Some(&totals));
        assert!(out.iter().all(|p| p.score == 0.0 && p.voting_weight == 0.0));
        assert!(out.iter().all(|p| p.token_allocation == 0.0));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(calculate_voting_weights(&[], &tvl_only(), None).is_empty());
    }

    #[test]
    fn shares_and_allocations_sum_to_budget() {
        let weights = WeightConfig {
            fees: 0.6,
            tvl: 0.2,
            volume: 0.05,
            rewards_to_tvl: 0.05,
            rewards_to_fees: 0.1,
            rewards_to_volume: 0.0,
        };
        let pools: Vec<PoolRecord> = (1..=7)
            .map(|i| {
                let f = i as f64;
                PoolRecord::from_metrics(
                    format!("p{i}"),
                    format!("P{i}"),
                    1_000.0 * f,
                    37.0 * (8.0 - f),
                    500.0 + 13.0 * f * f,
                    11.0 * f,
                )
            })
            .collect();
        let totals = RewardTotals {
            token_total: 1_000_000.0,
            stable_total: 0.0,
        };

        let out = calculate_voting_weights(&pools, &weights, Some(&totals));
        let share_sum: f64 = out.iter().map(|p| p.voting_weight).sum();
        let token_sum: f64 = out.iter().map(|p| p.token_allocation).sum();
        // Each reported share is rounded to 6 dp, so the sum may drift by up to 5e-7 per pool.
        let participants = out.iter().filter(|p| p.voting_weight > 0.0).count() as f64;
        assert_abs_diff_eq!(share_sum, 1.0, epsilon = participants * 5e-7 + 1e-12);
        assert_abs_diff_eq!(token_sum / totals.token_total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn round_to_keeps_six_places() {
        assert_eq!(round_to(0.123_456_7, 6), 0.123_457);
        assert_eq!(round_to(1.0 / 3.0, 6), 0.333_333);
        assert_eq!(round_to(0.0, 6), 0.0);
    }
}
