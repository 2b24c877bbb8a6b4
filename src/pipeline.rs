use tracing::info;

use crate::error::PipelineResult;
use crate::models::schema::TAXPAYER_ID;
use crate::models::{Record, Table};
use crate::stages::{
    FilterConfig, NormalizationResult, RepairResult, flatten_companies, merge_rows,
    normalize_companies, repair_and_filter, sort_table,
};

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    /// Column the final rows are ordered by
    pub sort_key: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            sort_key: TAXPAYER_ID.to_string(),
        }
    }
}

/// Per-stage counts of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub input_records: usize,
    pub repair: RepairResult,
    pub normalization: NormalizationResult,
    pub officer_rows: usize,
    pub agent_rows: usize,
    pub merged_rows: usize,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: Table,
    pub stats: PipelineStats,
}

/// Run every stage over one in-memory batch. Any error aborts the whole batch.
pub fn run_pipeline(mut records: Vec<Record>, config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    let mut stats = PipelineStats {
        input_records: records.len(),
        ..Default::default()
    };

    info!("Stage 0: repairing and filtering {} records...", records.len());
    stats.repair = repair_and_filter(&mut records, &config.filter)?;

    info!("Stage 1: normalizing companies...");
    stats.normalization = normalize_companies(&mut records)?;

    info!("Stage 2: flattening...");
    let flattened = flatten_companies(records)?;
    stats.officer_rows = flattened.officer_rows.len();
    stats.agent_rows = flattened.agent_rows.len();

    info!("Stage 3: merging duplicate rows...");
    let merged = merge_rows(flattened.officer_rows, flattened.agent_rows);
    stats.merged_rows = merged.rows.len();

    info!("Stage 4: sorting...");
    let table = sort_table(merged, &config.sort_key);

    Ok(PipelineOutput { table, stats })
}
