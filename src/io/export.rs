//! Export scored pools and holder lists.
//!
//! CSV exports are meant to be easy to consume in spreadsheets; the JSON run
//! export carries the run metadata alongside the ranked pools.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::{Holder, display_address, display_units};
use crate::domain::ScoredPool;
use crate::error::AppError;
use crate::scoring::PipelineOutput;

/// Number of holders written by [`write_holders_csv`] by default.
pub const DEFAULT_HOLDER_ROWS: usize = 100;

/// Write ranked pools to CSV.
pub fn write_results_csv(path: &Path, pools: &[ScoredPool]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::config(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record([
            "id",
            "symbol",
            "score",
            "voting_weight",
            "token_allocation",
            "stable_allocation",
        ])
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for p in pools {
        writer
            .write_record([
                p.id.clone(),
                p.symbol.clone(),
                format!("{:.6}", p.score),
                format!("{:.6}", p.voting_weight),
                format!("{:.6}", p.token_allocation),
                format!("{:.6}", p.stable_allocation),
            ])
            .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::config(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunExport<'a> {
    tool: &'static str,
    epoch: Option<u64>,
    generated_at: DateTime<Utc>,
    pools_in_snapshot: usize,
    participants: usize,
    zeroed_by_override: usize,
    failed_safety: usize,
    unmatched_overrides: &'a [String],
    pools: &'a [ScoredPool],
}

/// Write the full run (metadata + ranked pools) as pretty JSON.
pub fn write_run_json(path: &Path, epoch: Option<u64>, output: &PipelineOutput) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create run JSON '{}': {e}", path.display())))?;

    let export = RunExport {
        tool: "gv",
        epoch,
        generated_at: Utc::now(),
        pools_in_snapshot: output.stats.pools,
        participants: output.stats.participants,
        zeroed_by_override: output.stats.zeroed_by_override,
        failed_safety: output.stats.failed_safety,
        unmatched_overrides: &output.unmatched_overrides,
        pools: &output.ranked,
    };

    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::config(format!("Failed to write run JSON: {e}")))?;
    Ok(())
}

/// Write the top `limit` holders as `Rank,Address,Balance`.
pub fn write_holders_csv(path: &Path, holders: &[Holder], decimals: u8, limit: usize) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::config(format!("Failed to create holders CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["Rank", "Address", "Balance"])
        .map_err(|e| AppError::config(format!("Failed to write holders CSV header: {e}")))?;

    for (idx, h) in holders.iter().take(limit).enumerate() {
        writer
            .write_record([
                (idx + 1).to_string(),
                display_address(&h.address),
                display_units(h.balance, decimals),
            ])
            .map_err(|e| AppError::config(format!("Failed to write holders CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::config(format!("Failed to flush holders CSV: {e}")))?;
    Ok(())
}
