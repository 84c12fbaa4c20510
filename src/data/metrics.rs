//! Per-protocol epoch metrics (fees and bribes) from the Supreme metrics API.

use clap::ValueEnum;
use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://supreme-api-production.up.railway.app/metrics";

/// Protocols served by the metrics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    Nile,
    Ramses,
    Nuri,
}

impl Protocol {
    pub fn slug(self) -> &'static str {
        match self {
            Protocol::Nile => "nile",
            Protocol::Ramses => "ramses",
            Protocol::Nuri => "nuri",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProtocolMetrics {
    #[serde(default)]
    pub current_epoch: Option<u64>,
    /// Kept untyped so a malformed table is reported instead of failing the fetch.
    #[serde(default)]
    pub metrics: Option<Value>,
}

/// The `metrics` field of a payload, after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsTable {
    /// Absent or `null`.
    Missing,
    /// Present but not an array.
    Invalid,
    Entries(Vec<EpochMetrics>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpochMetrics {
    pub epoch: u64,
    #[serde(default)]
    pub fees_usd: f64,
    #[serde(default)]
    pub bribes_usd: f64,
}

impl ProtocolMetrics {
    /// Classify the metrics table. Array entries that do not decode (no
    /// `epoch`, non-numeric amounts) are skipped.
    pub fn table(&self) -> MetricsTable {
        match &self.metrics {
            None => MetricsTable::Missing,
            Some(Value::Array(items)) => MetricsTable::Entries(
                items
                    .iter()
                    .filter_map(|item| match EpochMetrics::deserialize(item) {
                        Ok(m) => Some(m),
                        Err(e) => {
                            debug!("skipping metrics entry {item}: {e}");
                            None
                        }
                    })
                    .collect(),
            ),
            Some(_) => MetricsTable::Invalid,
        }
    }

    /// Metrics recorded for `epoch`, if any.
    pub fn for_epoch(&self, epoch: u64) -> Option<EpochMetrics> {
        match self.table() {
            MetricsTable::Entries(entries) => entries.into_iter().find(|m| m.epoch == epoch),
            MetricsTable::Missing | MetricsTable::Invalid => None,
        }
    }
}

pub struct MetricsClient {
    client: Client,
    base_url: String,
}

impl MetricsClient {
    /// Build a client, reading `GV_METRICS_URL` (optional) from the environment / `.env`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("GV_METRICS_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn url_for(&self, protocol: Protocol) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), protocol.slug())
    }

    pub fn fetch(&self, protocol: Protocol) -> Result<ProtocolMetrics, AppError> {
        let url = self.url_for(protocol);
        info!("fetching protocol metrics from {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::upstream(format!("No response received from the server: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Metrics request failed with status {status}: {body}"
            )));
        }

        resp.json()
            .map_err(|e| AppError::upstream(format!("Failed to parse metrics response: {e}")))
    }
}
