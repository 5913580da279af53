//! Payload input: a JSON file, or stdin for `-` / no path.

use anyhow::{Context, Result};
use karma_core::acg::AcgCityRow;
use karma_core::coerce::field;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Read and parse a JSON payload.
pub fn read_payload(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading payload from stdin")?;
            buf
        }
    };
    parse_payload(&text)
}

/// Parse payload text. Blank input is treated as `null`.
pub fn parse_payload(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        debug!("empty payload");
        return Ok(Value::Null);
    }
    let value = serde_json::from_str(text).context("payload is not valid JSON")?;
    Ok(value)
}

/// City rows from a bare array or from `cities | rows | data | items`.
/// Rows that do not fit the row shape are skipped.
pub fn city_rows(payload: &Value) -> Vec<AcgCityRow> {
    let rows: &[Value] = match payload {
        Value::Array(items) => items.as_slice(),
        other => match field(Some(other), &["cities", "rows", "data", "items"]) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
    };

    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value(row.clone()) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(index = i, error = %e, "skipping city row");
                None
            }
        })
        .collect()
}
