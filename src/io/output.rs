use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::models::{Record, Table, TableRow};

/// Both serialized forms of a table, rendered before anything touches disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub json: String,
    pub csv: String,
}

impl RenderedTable {
    /// Render both formats; fails without side effects
    pub fn from_table(table: &Table) -> Result<Self> {
        Ok(Self {
            json: render_json(table)?,
            csv: render_csv(table)?,
        })
    }

    /// Write the JSON and CSV documents, both or neither.
    ///
    /// Each document is first written to a temp file beside its target; the
    /// targets are only replaced once both temp files are complete.
    pub fn write_files(&self, json_path: &Path, csv_path: &Path) -> Result<()> {
        let json_staged = stage_file(json_path, &self.json)?;
        let csv_staged = stage_file(csv_path, &self.csv)?;

        json_staged
            .persist(json_path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write file: {:?}", json_path))?;

        if let Err(e) = csv_staged.persist(csv_path) {
            std::fs::remove_file(json_path).ok();
            return Err(e.error).with_context(|| format!("Failed to write file: {:?}", csv_path));
        }

        Ok(())
    }
}

/// Write `contents` to a temp file in the directory of `target`
fn stage_file(target: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = target
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file for {:?}", target))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write temp file for {:?}", target))?;
    file.flush()
        .with_context(|| format!("Failed to flush temp file for {:?}", target))?;
    Ok(file)
}

/// Array of objects, one per row, every column present (null where the row has no value)
pub fn render_json(table: &Table) -> Result<String> {
    let records: Vec<Record> = table.rows.iter().map(|row| json_record(table, row)).collect();
    serde_json::to_string(&records).context("Failed to serialize table as JSON")
}

fn json_record(table: &Table, row: &TableRow) -> Record {
    table
        .columns
        .iter()
        .map(|column| (column.clone(), row.get(column).cloned().unwrap_or(Value::Null)))
        .collect()
}

/// Delimited text: an unnamed index column, then the sorted columns
pub fn render_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = std::iter::once("").chain(table.columns.iter().map(String::as_str));
    writer.write_record(header).context("Failed to write CSV header")?;

    for row in &table.rows {
        let mut cells = Vec::with_capacity(table.columns.len() + 1);
        cells.push(row.index.to_string());
        cells.extend(table.columns.iter().map(|column| csv_cell(row.get(column))));
        writer.write_record(&cells).context("Failed to write CSV row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(other) => other.to_string(),
    }
}
