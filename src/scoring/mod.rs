//! Epoch scoring pipeline.
//!
//! override -> safety -> normalize + score -> allocate -> rank
//!
//! Every stage is a pure function over an immutable slice; nothing here does
//! I/O or touches process-wide state.

pub mod allocate;
pub mod normalize;
pub mod overrides;
pub mod safety;
pub mod score;

use log::info;

use crate::domain::{PoolRecord, RunConfig, ScoredPool};

pub use allocate::allocate;
pub use normalize::{normalize, normalize_metrics};
pub use overrides::{OverrideOutcome, apply_multipliers};
pub use safety::{apply_safety_thresholds, is_safe};
pub use score::{calculate_voting_weights, round_to};

/// Counters describing what each stage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub pools: usize,
    /// Pools made ineligible by a zero (or negative) override.
    pub zeroed_by_override: usize,
    /// Pools that were still eligible after overrides but failed safety.
    pub failed_safety: usize,
    /// Pools that took part in scoring.
    pub participants: usize,
}

/// Output of [`run_pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// All pools, ranked by voting weight (descending).
    pub ranked: Vec<ScoredPool>,
    /// Override keys that matched no pool.
    pub unmatched_overrides: Vec<String>,
    pub stats: PipelineStats,
}

/// Run the full scoring pipeline for one epoch.
pub fn run_pipeline(pools: &[PoolRecord], config: &RunConfig) -> PipelineOutput {
    let eligible_before = pools.iter().filter(|p| p.eligible).count();

    let OverrideOutcome { pools: overridden, unmatched } = apply_multipliers(pools, &config.overrides);
    let eligible_after_override = overridden.iter().filter(|p| p.eligible).count();

    let safe = apply_safety_thresholds(&overridden, &config.thresholds);
    let eligible_after_safety = safe.iter().filter(|p| p.eligible).count();

    let stats = PipelineStats {
        pools: pools.len(),
        zeroed_by_override: eligible_before - eligible_after_override,
        failed_safety: eligible_after_override - eligible_after_safety,
        participants: safe.iter().filter(|p| p.participates()).count(),
    };
    info!(
        "scoring {} pools: {} participate ({} zeroed by override, {} failed safety)",
        stats.pools, stats.participants, stats.zeroed_by_override, stats.failed_safety
    );

    let scored = calculate_voting_weights(&safe, &config.weights, config.totals.as_ref());

    PipelineOutput {
        ranked: rank_by_voting_weight(scored),
        unmatched_overrides: unmatched,
        stats,
    }
}

/// Sort by voting weight, highest first. Ties keep their input order.
pub fn rank_by_voting_weight(mut pools: Vec<ScoredPool>) -> Vec<ScoredPool> {
    pools.sort_by(|a, b| {
        b.voting_weight
            .partial_cmp(&a.voting_weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pools
}
