//! Shared "score an epoch" workflow.
//!
//! config -> snapshot (API or file) -> pool records -> scoring pipeline
//!
//! The CLI only handles presentation and exports on top of this.

use log::info;

use crate::cli::ScoreArgs;
use crate::data::{RawGauge, SnapshotClient, read_snapshot_file, snapshot_to_pools};
use crate::domain::{PoolRecord, RunConfig};
use crate::error::AppError;
use crate::io::load_with_override_table;
use crate::scoring::{PipelineOutput, run_pipeline};

/// All computed outputs of a single `gv score` run.
#[derive(Debug, Clone)]
pub struct ScoreRun {
    pub epoch: Option<u64>,
    pub config: RunConfig,
    pub pools: Vec<PoolRecord>,
    pub output: PipelineOutput,
}

/// Load configuration and snapshot, then run the scoring pipeline.
pub fn run_score(args: &ScoreArgs) -> Result<ScoreRun, AppError> {
    let config = load_with_override_table(&args.config, args.overrides.as_deref())?;

    let (epoch, raw) = load_snapshot(args)?;
    Ok(score_snapshot(epoch, config, &raw))
}

/// Score an already-loaded snapshot.
pub fn score_snapshot(epoch: Option<u64>, config: RunConfig, raw: &[RawGauge]) -> ScoreRun {
    let pools = snapshot_to_pools(raw);
    info!("{} of {} gauges are live with rewards", pools.len(), raw.len());

    let output = run_pipeline(&pools, &config);
    ScoreRun {
        epoch,
        config,
        pools,
        output,
    }
}

fn load_snapshot(args: &ScoreArgs) -> Result<(Option<u64>, Vec<RawGauge>), AppError> {
    if let Some(path) = &args.snapshot {
        return Ok((args.epoch, read_snapshot_file(path)?));
    }
    let epoch = match args.epoch {
        Some(e) => e,
        None => crate::cli::picker::prompt_for_epoch(None)?,
    };
    let raw = SnapshotClient::from_env().fetch_epoch(epoch)?;
    Ok((Some(epoch), raw))
}
