//! Bribe totals from the Equalizer gauges endpoint.

use std::collections::BTreeMap;

use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

const DEFAULT_URL: &str = "https://eqapi-sonic-prod-ltanm.ondigitalocean.app/sonic/v4/gauges/bribes";

#[derive(Debug, Default, Deserialize)]
pub struct BribesResponse {
    #[serde(default)]
    pub data: BTreeMap<String, GaugeBribes>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeBribes {
    /// Upstream sends this as a string; numbers are accepted too.
    #[serde(default)]
    pub total_bribe_value_usd: Value,
}

pub struct BribeClient {
    client: Client,
    url: String,
}

impl BribeClient {
    /// Build a client, reading `GV_BRIBES_URL` (optional) from the environment / `.env`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var("GV_BRIBES_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn fetch(&self) -> Result<BribesResponse, AppError> {
        info!("fetching gauge bribes from {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::upstream(format!("Bribes request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::upstream(format!(
                "Bribes request failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| AppError::upstream(format!("Failed to parse bribes response: {e}")))
    }
}

/// Sum `totalBribeValueUsd` across gauges. Missing or unparseable values count as zero.
pub fn sum_bribes(response: &BribesResponse) -> f64 {
    response
        .data
        .iter()
        .map(|(gauge, bribes)| match parse_usd(&bribes.total_bribe_value_usd) {
            Some(v) => v,
            None => {
                warn!("gauge {gauge}: unreadable bribe value {}", bribes.total_bribe_value_usd);
                0.0
            }
        })
        .sum()
}

fn parse_usd(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}
