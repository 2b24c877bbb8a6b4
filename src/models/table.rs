use serde_json::Value;

use super::Record;

/// A merged output row and its position in group order
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Index of the merge group this row came from
    pub index: usize,
    pub fields: Record,
}

impl TableRow {
    /// Value of `column`, `None` when the row holds nothing there
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }
}

/// The final sorted table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in lexicographic order
    pub columns: Vec<String>,
    /// Rows ordered by the sort key
    pub rows: Vec<TableRow>,
}

impl Table {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
