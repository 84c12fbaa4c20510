//! Manual multiplier overrides.

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::domain::{MultiplierOverrides, PoolRecord};

/// Multiplier assigned when no override names the pool.
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

/// Output of the override stage.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideOutcome {
    pub pools: Vec<PoolRecord>,
    /// Override keys that matched no pool in the snapshot (sorted).
    pub unmatched: Vec<String>,
}

/// Apply `overrides` to every still-eligible pool.
///
/// A key matches a pool by `id`; a key equal to the `symbol` label is used
/// only when no key names the id. Pools without a matching key get
/// [`DEFAULT_MULTIPLIER`]. A multiplier `<= 0` makes the pool ineligible.
/// Pools that are already ineligible are passed through untouched.
pub fn apply_multipliers(pools: &[PoolRecord], overrides: &MultiplierOverrides) -> OverrideOutcome {
    let mut used: BTreeSet<&str> = BTreeSet::new();

    let out = pools
        .iter()
        .map(|pool| {
            let mut next = pool.clone();

            // Keys count as matched even for ineligible pools: the entry is not stale.
            let hit = lookup(pool, overrides);
            if let Some((key, _)) = hit {
                used.insert(key);
            }

            if !pool.eligible {
                return next;
            }

            let multiplier = hit.map(|(_, m)| m).unwrap_or(DEFAULT_MULTIPLIER);
            next.weight_multiplier = multiplier;
            if !(multiplier > 0.0) {
                debug!("override zeroed pool {}", pool.symbol);
                next.eligible = false;
            }
            next
        })
        .collect();

    let unmatched: Vec<String> = overrides
        .keys()
        .filter(|k| !used.contains(k.as_str()))
        .cloned()
        .collect();

    for key in &unmatched {
        warn!("override for '{key}' matched no pool in the snapshot");
    }

    OverrideOutcome { pools: out, unmatched }
}

fn lookup<'a>(pool: &PoolRecord, overrides: &'a MultiplierOverrides) -> Option<(&'a str, f64)> {
    overrides
        .get_key_value(&pool.id)
        .or_else(|| overrides.get_key_value(&pool.symbol))
        .map(|(k, v)| (k.as_str(), *v))
}
