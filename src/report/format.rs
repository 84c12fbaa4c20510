//! Formatted terminal output for runs and lookups.
//!
//! Every formatter returns a `String` so callers decide where it goes and tests
//! can compare the text directly.

use crate::data::{EpochMetrics, Holder, display_address, display_units};
use crate::domain::{RunConfig, ScoredPool};
use crate::scoring::PipelineOutput;

/// Width of the pool label column.
const LABEL_WIDTH: usize = 40;

/// Format the run header: epoch, config summary and stage counters.
pub fn format_run_summary(epoch: Option<u64>, output: &PipelineOutput, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== gv - Gauge Voting Weights ===\n");
    match epoch {
        Some(e) => out.push_str(&format!("Epoch: {e}\n")),
        None => out.push_str("Epoch: (snapshot file)\n"),
    }

    let w = &config.weights;
    out.push_str(&format!(
        "Weights: tvl={} fees={} volume={} r/tvl={} r/fees={} r/volume={}\n",
        w.tvl, w.fees, w.volume, w.rewards_to_tvl, w.rewards_to_fees, w.rewards_to_volume
    ));

    let t = &config.thresholds;
    out.push_str(&format!(
        "Minimums: tvl={} volume={} fees={} rewards={}\n",
        t.min_tvl, t.min_volume, t.min_fees, t.min_rewards
    ));

    if let Some(totals) = &config.totals {
        out.push_str(&format!(
            "Budgets: token={:.2} stable={:.2}\n",
            totals.token_total, totals.stable_total
        ));
    }

    let s = &output.stats;
    out.push_str(&format!(
        "Pools: n={} | scored={} | zeroed by override={} | failed safety={}\n",
        s.pools, s.participants, s.zeroed_by_override, s.failed_safety
    ));

    if !output.unmatched_overrides.is_empty() {
        out.push_str(&format!(
            "Warning: {} override(s) matched no pool:\n",
            output.unmatched_overrides.len()
        ));
        for key in &output.unmatched_overrides {
            out.push_str(&format!("  - {key}\n"));
        }
    }

    out
}

/// Format the top `top_n` pools, one line each.
pub fn format_allocation_table(pools: &[ScoredPool], top_n: usize) -> String {
    let mut out = String::new();
    for p in pools.iter().take(top_n) {
        out.push_str(&format!(
            "{:<width$} Score: {:.4}  Weight: {:.2}%  token: {:.2}",
            truncate(&p.symbol, LABEL_WIDTH),
            p.score,
            p.voting_weight * 100.0,
            p.token_allocation,
            width = LABEL_WIDTH,
        ));
        if p.stable_allocation != 0.0 {
            out.push_str(&format!("  stable: {:.2}", p.stable_allocation));
        }
        out.push('\n');
    }
    out
}

pub fn format_bribe_total(total: f64) -> String {
    format!("Total of all bribes (USD): {total:.2}")
}

/// Format one epoch's fees and bribes.
pub fn format_epoch_metrics(epoch: u64, metrics: &EpochMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nMetrics for epoch {epoch}:\n"));
    out.push_str("------------------------\n");
    out.push_str(&format!("Fees (USD): ${:.2}\n", metrics.fees_usd));
    out.push_str(&format!("Bribes (USD): ${:.2}", metrics.bribes_usd));
    out
}

/// Format the top `top_n` holders as a ranked table.
pub fn format_holders(holders: &[Holder], decimals: u8, top_n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>5} {:<42} {:>24}\n", "rank", "address", "balance"));
    out.push_str(&format!("{:->5} {:-<42} {:->24}\n", "", "", ""));
    for (idx, h) in holders.iter().take(top_n).enumerate() {
        out.push_str(&format!(
            "{:>5} {:<42} {:>24}\n",
            idx + 1,
            display_address(&h.address),
            display_units(h.balance, decimals)
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::PipelineStats;

    fn pool(symbol: &str, weight: f64, stable: f64) -> ScoredPool {
        ScoredPool {
            id: symbol.to_string(),
            symbol: symbol.to_string(),
            score: weight * 2.0,
            voting_weight: weight,
            token_allocation: weight * 1_000_000.0,
            stable_allocation: stable,
        }
    }

    #[test]
    fn allocation_lines_match_layout() {
        let table = format_allocation_table(&[pool("USDC/WETH Gamma (Narrow)", 0.25, 0.0)], 20);
        assert_eq!(
            table,
            format!(
                "{:<40} Score: 0.5000  Weight: 25.00%  token: 250000.00\n",
                "USDC/WETH Gamma (Narrow)"
            )
        );
    }

    #[test]
    fn allocation_table_respects_top_n_and_stable_column() {
        let pools = vec![pool("A", 0.6, 12.5), pool("B", 0.4, 0.0), pool("C", 0.0, 0.0)];
        let table = format_allocation_table(&pools, 2);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("stable: 12.50"));
        assert!(!lines[1].contains("stable"));
    }

    #[test]
    fn long_labels_are_truncated() {
        let long = "X".repeat(60);
        let table = format_allocation_table(&[pool(&long, 1.0, 0.0)], 1);
        assert!(table.starts_with(&format!("{}.", "X".repeat(39))));
    }

    #[test]
    fn summary_lists_unmatched_overrides() {
        let output = PipelineOutput {
            ranked: vec![],
            unmatched_overrides: vec!["USDC/LYNX Clasic Stable".to_string()],
            stats: PipelineStats {
                pools: 4,
                zeroed_by_override: 1,
                failed_safety: 2,
                participants: 1,
            },
        };
        let summary = format_run_summary(Some(60), &output, &RunConfig::default());
        assert!(summary.contains("Epoch: 60"));
        assert!(summary.contains("Pools: n=4 | scored=1 | zeroed by override=1 | failed safety=2"));
        assert!(summary.contains("  - USDC/LYNX Clasic Stable"));
    }

    #[test]
    fn bribe_and_metric_lines() {
        assert_eq!(format_bribe_total(1234.567), "Total of all bribes (USD): 1234.57");
        let m = EpochMetrics {
            epoch: 5,
            fees_usd: 10.0,
            bribes_usd: 2.5,
        };
        let text = format_epoch_metrics(5, &m);
        assert!(text.contains("Fees (USD): $10.00"));
        assert!(text.ends_with("Bribes (USD): $2.50"));
    }

    #[test]
    fn holder_rows_keep_full_precision() {
        use ethers::types::{Address, U256};

        let holders = vec![Holder {
            address: Address::from_low_u64_be(0xaa),
            balance: (U256::one() << 130usize) + U256::from(7),
        }];
        let table = format_holders(&holders, 0, 10);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].to_lowercase().contains("0x00000000000000000000000000000000000000aa"));
        assert!(lines[2].ends_with(&((U256::one() << 130usize) + U256::from(7)).to_string()));
    }
}
