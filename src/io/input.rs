use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use crate::models::Record;

/// Parse a file holding a JSON array of company records
pub fn parse_records_file(path: &Path) -> Result<Vec<Record>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_records_json(&content).with_context(|| format!("Failed to parse records in {:?}", path))
}

/// Parse a JSON array of company records
pub fn parse_records_json(json: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(json).context("Failed to parse records JSON")?;

    let Value::Array(items) = value else {
        bail!("Expected a top-level array of records");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(anyhow!("Record #{} is not an object: {}", index, other)),
        })
        .collect()
}
