//! Epoch snapshot adapter for the Lynex tracking API.

use std::fs::File;
use std::path::Path;

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::domain::PoolRecord;
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://prod-api.lynex.fi/tracking/snapshot/epoch";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// One gauge entry as returned by the snapshot endpoint.
///
/// Numeric fields are optional upstream; missing values are read as `0`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGauge {
    pub symbol: String,
    pub title: String,
    /// Pool or gauge address, when present.
    pub address: Option<String>,
    pub gauge_alive: bool,
    pub tvl: Option<f64>,
    pub gauge_fee_in_usd: Option<f64>,
    pub volume_usd: Option<f64>,
    pub gauge_reward_per_epoch_usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    pools: Vec<RawGauge>,
}

pub struct SnapshotClient {
    client: Client,
    base_url: String,
}

impl SnapshotClient {
    /// Build a client, reading `GV_SNAPSHOT_URL` (optional) from the environment / `.env`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("GV_SNAPSHOT_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch all gauges for `epoch`.
    pub fn fetch_epoch(&self, epoch: u64) -> Result<Vec<RawGauge>, AppError> {
        let url = format!("{}/{epoch}", self.base_url.trim_end_matches('/'));
        info!("fetching epoch {epoch} snapshot from {url}");

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .map_err(|e| AppError::upstream(format!("Snapshot request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::upstream(format!("API error {}", resp.status().as_u16())));
        }

        let body: SnapshotResponse = resp
            .json()
            .map_err(|e| AppError::upstream(format!("Failed to parse snapshot response: {e}")))?;

        debug!("snapshot returned {} gauges", body.pools.len());
        Ok(body.pools)
    }
}

/// Read a snapshot payload (same shape as the API response) from disk.
pub fn read_snapshot_file(path: &Path) -> Result<Vec<RawGauge>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open snapshot '{}': {e}", path.display())))?;
    let body: SnapshotResponse = serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid snapshot JSON '{}': {e}", path.display())))?;
    Ok(body.pools)
}

/// Turn raw gauges into pool records.
///
/// Only live gauges with a positive epoch reward are kept.
pub fn snapshot_to_pools(raw: &[RawGauge]) -> Vec<PoolRecord> {
    raw.iter()
        .filter(|g| g.gauge_alive && g.gauge_reward_per_epoch_usd.unwrap_or(0.0) > 0.0)
        .map(|g| {
            let label = format!("{} {}", g.symbol, g.title);
            let id = match g.address.as_deref().map(str::trim) {
                Some(addr) if !addr.is_empty() => addr.to_lowercase(),
                _ => label.clone(),
            };
            PoolRecord::from_metrics(
                id,
                label,
                g.tvl.unwrap_or(0.0),
                g.gauge_fee_in_usd.unwrap_or(0.0),
                g.volume_usd.unwrap_or(0.0),
                g.gauge_reward_per_epoch_usd.unwrap_or(0.0),
            )
        })
        .collect()
}
