//! Proportional reward allocation.

use crate::domain::RewardTotals;

/// Split each reward budget by `share`, returning `(token, stable)`.
///
/// A zero share, or no budgets at all, yields zero allocations.
pub fn allocate(share: f64, totals: Option<&RewardTotals>) -> (f64, f64) {
    match totals {
        Some(t) if share != 0.0 => (share * t.token_total, share * t.stable_total),
        _ => (0.0, 0.0),
    }
}
