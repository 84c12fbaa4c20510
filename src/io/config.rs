//! Run configuration loading.
//!
//! The JSON schema is `domain::RunConfig`:
//!
//! ```json
//! {
//!   "weights":    { "fees": 0.6, "tvl": 0.2, "volume": 0.05, "rewardsToTVL": 0.05, "rewardsToFees": 0.1, "rewardsToVolume": 0 },
//!   "thresholds": { "minTVL": 10000, "minVolume": 10000, "minFees": 100, "minRewards": 100 },
//!   "overrides":  { "USDC/MAI Classic Stable": 0.5 },
//!   "totals":     { "tokenTotal": 1000000, "stableTotal": 0 }
//! }
//! ```

use std::fs::File;
use std::path::Path;

use log::debug;

use crate::domain::RunConfig;
use crate::error::AppError;
use crate::io::overrides::read_override_table;

/// Read a run configuration JSON file.
pub fn load_run_config(path: &Path) -> Result<RunConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open config '{}': {e}", path.display())))?;
    let config: RunConfig = serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid config JSON '{}': {e}", path.display())))?;
    debug!(
        "loaded config from {} ({} overrides)",
        path.display(),
        config.overrides.len()
    );
    Ok(config)
}

/// Load the config and merge an optional override table on top of it.
///
/// Table entries replace config entries with the same key.
pub fn load_with_override_table(path: &Path, table: Option<&Path>) -> Result<RunConfig, AppError> {
    let mut config = load_run_config(path)?;
    if let Some(table) = table {
        let extra = read_override_table(table)?;
        debug!("merging {} overrides from {}", extra.len(), table.display());
        config.overrides.extend(extra);
    }
    Ok(config)
}
