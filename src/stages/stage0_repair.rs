use serde_json::Value;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};
use crate::models::schema::{AGENT_NAME, OFFICER_LIST_KEY, OFFICER_LIST_SOURCE_KEY, STATUS};
use crate::models::{Record, describe_record};

/// Business predicates applied before normalization
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Companies whose agent name equals this literal are dropped
    pub excluded_agent_name: String,
    /// Companies whose status is not exactly this literal are dropped
    pub required_status: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_agent_name: "Not on file".to_string(),
            required_status: "ACTIVE".to_string(),
        }
    }
}

/// Result of Stage 0
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairResult {
    /// Records where the key was missing or null
    pub repaired: usize,
    /// Records removed by the filter
    pub dropped: usize,
}

/// Make sure every record holds `key`, resetting it to `default` when absent or null.
/// Returns how many records were touched.
pub fn repair_record_keys(records: &mut [Record], key: &str, default: &Value) -> usize {
    let mut repaired = 0;
    for record in records.iter_mut() {
        if matches!(record.get(key), None | Some(Value::Null)) {
            record.insert(key.to_string(), default.clone());
            repaired += 1;
        }
    }
    repaired
}

/// Move a misspelled `source` key onto `canonical`.
///
/// A non-null `source` value wins over whatever `canonical` holds; a null or
/// absent `source` leaves `canonical` untouched. Returns whether a value moved.
pub fn canonicalize_key(record: &mut Record, source: &str, canonical: &str) -> bool {
    match record.remove(source) {
        None | Some(Value::Null) => false,
        Some(value) => {
            record.insert(canonical.to_string(), value);
            true
        }
    }
}

/// Whether a company passes both predicates
fn passes_filter(record: &Record, index: usize, config: &FilterConfig) -> PipelineResult<bool> {
    let agent_name = record
        .get(AGENT_NAME)
        .ok_or_else(|| PipelineError::missing(AGENT_NAME, describe_record("company", index, record)))?;
    let status = record
        .get(STATUS)
        .ok_or_else(|| PipelineError::missing(STATUS, describe_record("company", index, record)))?;

    let meaningful_agent = agent_name.as_str() != Some(config.excluded_agent_name.as_str());
    let active = status.as_str() == Some(config.required_status.as_str());
    Ok(meaningful_agent && active)
}

/// Drop companies without a meaningful agent or an active status, in place.
///
/// Every record is checked before any is removed, so a missing predicate
/// field fails the batch without touching it.
pub fn filter_records(records: &mut Vec<Record>, config: &FilterConfig) -> PipelineResult<usize> {
    let keep = records
        .iter()
        .enumerate()
        .map(|(i, record)| passes_filter(record, i, config))
        .collect::<PipelineResult<Vec<bool>>>()?;

    let before = records.len();
    let mut flags = keep.into_iter();
    records.retain(|_| flags.next().unwrap_or(false));

    let dropped = before - records.len();
    debug!("Filter dropped {} of {} companies", dropped, before);
    Ok(dropped)
}

/// Perform Stage 0: officer-list key repair, then filtering.
///
/// The officer list may arrive as `offiersList`, `officersList`, or not at all;
/// afterwards every record holds a non-null `officersList`.
pub fn repair_and_filter(
    records: &mut Vec<Record>,
    config: &FilterConfig,
) -> PipelineResult<RepairResult> {
    let moved = records
        .iter_mut()
        .map(|record| canonicalize_key(record, OFFICER_LIST_SOURCE_KEY, OFFICER_LIST_KEY))
        .filter(|moved| *moved)
        .count();
    debug!("Moved {} officer lists from {}", moved, OFFICER_LIST_SOURCE_KEY);

    let repaired = repair_record_keys(records, OFFICER_LIST_KEY, &Value::Array(Vec::new()));
    let dropped = filter_records(records, config)?;

    info!(
        "Stage 0: {} records repaired, {} dropped, {} kept",
        repaired,
        dropped,
        records.len()
    );

    Ok(RepairResult { repaired, dropped })
}
