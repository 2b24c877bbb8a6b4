use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::{debug, info};

use crate::models::schema::{AGENT_TITLE, MERGE_EXCLUDED_FIELDS};
use crate::models::{Record, TableRow, value_to_text};

/// Result of Stage 3 merging, in group order (unsorted)
#[derive(Debug, Clone, Default)]
pub struct MergeResult {
    /// Union of field names across all rows, lexicographic
    pub columns: Vec<String>,
    /// One row per group, indexed by first encounter
    pub rows: Vec<TableRow>,
    /// Rows fed into the merge
    pub rows_in: usize,
}

/// Trim a string value, then strip every period from it
pub fn clean_text(value: &str) -> String {
    value.trim().replace('.', "")
}

/// Apply [`clean_text`] to every string field. Other values pass through.
pub fn clean_row(row: &mut Record) {
    for value in row.values_mut() {
        if let Value::String(text) = value {
            *text = clean_text(text);
        }
    }
}

/// Perform Stage 3: union the row sets, clean every row, collapse duplicates.
///
/// Rows equal on every column outside [`MERGE_EXCLUDED_FIELDS`] form one group.
/// A column a row does not hold only matches rows that also lack it. The
/// surviving row takes its key fields from the first member and a
/// comma-joined title from all members, in encounter order.
pub fn merge_rows(officer_rows: Vec<Record>, agent_rows: Vec<Record>) -> MergeResult {
    let mut rows: Vec<Record> = officer_rows.into_iter().chain(agent_rows).collect();
    let rows_in = rows.len();
    rows.iter_mut().for_each(clean_row);

    let columns: BTreeSet<String> = rows.iter().flat_map(|row| row.keys().cloned()).collect();
    let key_columns: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|column| !MERGE_EXCLUDED_FIELDS.contains(column))
        .collect();

    let mut groups: Vec<(Record, Vec<String>)> = Vec::new();
    let mut lookup: HashMap<String, usize> = HashMap::new();

    for mut row in rows {
        let title = row.remove(AGENT_TITLE).map(|value| value_to_text(&value));
        let key = group_key(&row, &key_columns);

        let slot = *lookup.entry(key).or_insert_with(|| {
            groups.push((row, Vec::new()));
            groups.len() - 1
        });
        if let Some(title) = title {
            groups[slot].1.push(title);
        }
    }

    debug!("Merged {} rows into {} groups", rows_in, groups.len());

    let rows: Vec<TableRow> = groups
        .into_iter()
        .enumerate()
        .map(|(index, (mut fields, titles))| {
            if !titles.is_empty() {
                fields.insert(AGENT_TITLE.to_string(), Value::String(titles.join(",")));
            }
            TableRow { index, fields }
        })
        .collect();

    info!(
        "Stage 3: {} rows merged into {} ({} columns)",
        rows_in,
        rows.len(),
        columns.len()
    );

    MergeResult {
        columns: columns.into_iter().collect(),
        rows,
        rows_in,
    }
}

/// Canonical text of the key columns. A missing field is encoded as a NUL
/// marker, which JSON text never contains unescaped.
fn group_key(row: &Record, key_columns: &[&str]) -> String {
    let mut key = String::new();
    for column in key_columns {
        match row.get(*column) {
            Some(value) => key.push_str(&value.to_string()),
            None => key.push('\u{0}'),
        }
        key.push('\u{1}');
    }
    key
}
