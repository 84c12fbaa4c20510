//! Shared domain types.
//!
//! Everything here is plain data: created fresh for each epoch run and never
//! mutated in place by the scoring stages (each stage returns new records).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One gauge's metrics for a single epoch, as seen by the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    /// Stable join key: pool/gauge address when the snapshot has one, else the label.
    pub id: String,
    /// Display label, e.g. `"USDC/WETH Gamma (Narrow)"`.
    pub symbol: String,

    pub tvl: f64,
    pub fees: f64,
    pub volume: f64,
    pub rewards: f64,

    pub rewards_to_tvl: f64,
    pub rewards_to_fees: f64,
    pub rewards_to_volume: f64,

    /// Gate: once `false`, no stage sets it back to `true`.
    pub eligible: bool,
    /// Scoring multiplier applied to the raw score.
    pub weight_multiplier: f64,
    pub bve_enabled: bool,
}

impl PoolRecord {
    /// Build a fresh record from raw USD metrics, deriving the reward ratios.
    ///
    /// A ratio whose denominator is zero is reported as `0`.
    pub fn from_metrics(
        id: impl Into<String>,
        symbol: impl Into<String>,
        tvl: f64,
        fees: f64,
        volume: f64,
        rewards: f64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            tvl,
            fees,
            volume,
            rewards,
            rewards_to_tvl: ratio(rewards, tvl),
            rewards_to_fees: ratio(rewards, fees),
            rewards_to_volume: ratio(rewards, volume),
            eligible: true,
            weight_multiplier: 1.0,
            bve_enabled: true,
        }
    }

    /// Value of `metric` for this pool.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Tvl => self.tvl,
            Metric::Fees => self.fees,
            Metric::Volume => self.volume,
            Metric::RewardsToTvl => self.rewards_to_tvl,
            Metric::RewardsToFees => self.rewards_to_fees,
            Metric::RewardsToVolume => self.rewards_to_volume,
        }
    }

    /// Whether the pool takes part in normalization and scoring.
    pub fn participates(&self) -> bool {
        self.eligible && self.bve_enabled && self.weight_multiplier > 0.0
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// The six scored metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Tvl,
    Fees,
    Volume,
    RewardsToTvl,
    RewardsToFees,
    RewardsToVolume,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Tvl,
        Metric::Fees,
        Metric::Volume,
        Metric::RewardsToTvl,
        Metric::RewardsToFees,
        Metric::RewardsToVolume,
    ];

    /// Position of the metric inside a `[f64; 6]` row.
    pub fn index(self) -> usize {
        match self {
            Metric::Tvl => 0,
            Metric::Fees => 1,
            Metric::Volume => 2,
            Metric::RewardsToTvl => 3,
            Metric::RewardsToFees => 4,
            Metric::RewardsToVolume => 5,
        }
    }
}

/// Per-metric coefficients.
///
/// They are not required to sum to 1; the score is a plain linear combination.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeightConfig {
    pub tvl: f64,
    pub fees: f64,
    pub volume: f64,
    #[serde(rename = "rewardsToTVL")]
    pub rewards_to_tvl: f64,
    pub rewards_to_fees: f64,
    pub rewards_to_volume: f64,
}

impl WeightConfig {
    pub fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Tvl => self.tvl,
            Metric::Fees => self.fees,
            Metric::Volume => self.volume,
            Metric::RewardsToTvl => self.rewards_to_tvl,
            Metric::RewardsToFees => self.rewards_to_fees,
            Metric::RewardsToVolume => self.rewards_to_volume,
        }
    }
}

/// Inclusive minimums a pool must meet to stay eligible.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafetyThresholds {
    #[serde(rename = "minTVL")]
    pub min_tvl: f64,
    pub min_volume: f64,
    pub min_fees: f64,
    pub min_rewards: f64,
}

/// Pool key (id or label) → multiplier. Missing keys mean `1`.
pub type MultiplierOverrides = BTreeMap<String, f64>;

/// Absolute reward budgets split proportionally to voting weight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewardTotals {
    pub token_total: f64,
    pub stable_total: f64,
}

/// Final per-pool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPool {
    pub id: String,
    pub symbol: String,
    pub score: f64,
    /// Share of the epoch's voting weight, rounded to 6 dp.
    pub voting_weight: f64,
    pub token_allocation: f64,
    pub stable_allocation: f64,
}

/// Caller-supplied configuration for one scoring run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunConfig {
    pub weights: WeightConfig,
    pub thresholds: SafetyThresholds,
    pub overrides: MultiplierOverrides,
    pub totals: Option<RewardTotals>,
}
