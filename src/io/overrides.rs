//! Tab-separated multiplier table, as pasted from the classification sheet.
//!
//! Each row is `<label>\t<pool type>\t<category>\t<multiplier>`. Runs of tabs
//! count as one separator. Rows that do not have exactly four fields, or whose
//! multiplier is not a number, are skipped.

use std::path::Path;

use log::warn;

use crate::domain::MultiplierOverrides;
use crate::error::AppError;

pub fn parse_override_table(text: &str) -> MultiplierOverrides {
    let mut out = MultiplierOverrides::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').filter(|p| !p.is_empty()).collect();
        let [name, _, _, value] = parts.as_slice() else {
            warn!("override table line {}: expected 4 fields, got {}", idx + 1, parts.len());
            continue;
        };
        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => {
                out.insert(name.trim().to_string(), v);
            }
            _ => warn!("override table line {}: bad multiplier '{value}'", idx + 1),
        }
    }

    out
}

pub fn read_override_table(path: &Path) -> Result<MultiplierOverrides, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Failed to read override table '{}': {e}", path.display())))?;
    Ok(parse_override_table(&text))
}
