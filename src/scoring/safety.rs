//! Minimum-liquidity safety filter.

use log::debug;

use crate::domain::{PoolRecord, SafetyThresholds};

/// `true` when every metric meets its minimum (inclusive).
pub fn is_safe(pool: &PoolRecord, thresholds: &SafetyThresholds) -> bool {
    pool.tvl >= thresholds.min_tvl
        && pool.volume >= thresholds.min_volume
        && pool.fees >= thresholds.min_fees
        && pool.rewards >= thresholds.min_rewards
}

/// Mark every unsafe pool ineligible. Other fields pass through unchanged.
///
/// This can only remove eligibility, so running it after the override stage
/// keeps the safety decision final.
pub fn apply_safety_thresholds(pools: &[PoolRecord], thresholds: &SafetyThresholds) -> Vec<PoolRecord> {
    pools
        .iter()
        .map(|pool| {
            let mut next = pool.clone();
            if !is_safe(pool, thresholds) {
                if pool.eligible {
                    debug!("pool {} fails safety thresholds", pool.symbol);
                }
                next.eligible = false;
            }
            next
        })
        .collect()
}
