use std::cmp::Ordering;

use serde_json::Value;
use tracing::info;

use crate::models::Table;

use super::MergeResult;

/// Perform Stage 4: lexicographic columns, rows stably sorted by `sort_key`
pub fn sort_table(merged: MergeResult, sort_key: &str) -> Table {
    let mut columns = merged.columns;
    columns.sort();

    let mut rows = merged.rows;
    // stable, so equal keys keep group order
    rows.sort_by(|a, b| compare_values(a.get(sort_key), b.get(sort_key)));

    let table = Table { columns, rows };
    info!("Stage 4: sorted table shape {:?}", table.shape());
    table
}

/// Total order over optional JSON values. Null sorts after every value and a
/// missing value after null.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let by_rank = type_rank(a).cmp(&type_rank(b));
            if by_rank != Ordering::Equal {
                return by_rank;
            }
            match (a, b) {
                (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
                (Value::Number(a), Value::Number(b)) => {
                    let a = a.as_f64().unwrap_or(f64::NAN);
                    let b = b.as_f64().unwrap_or(f64::NAN);
                    a.total_cmp(&b)
                }
                (Value::String(a), Value::String(b)) => a.cmp(b),
                (Value::Null, Value::Null) => Ordering::Equal,
                (a, b) => a.to_string().cmp(&b.to_string()),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}
