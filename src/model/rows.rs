//! Row preview model for the top-N rows of a dataset

use serde_json::{Map, Value};

/// One record as returned by the backend, keys in server order
pub type Row = Map<String, Value>;

/// Top rows fetched for a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPreview {
    pub dataset: String,
    pub rows: Vec<Row>,
}

impl RowPreview {
    pub fn new(dataset: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            dataset: dataset.into(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column headers, taken from the key set of the first row.
    ///
    /// An empty row set has no columns; that is not an error.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Display cells for every row, aligned to `columns()`
    pub fn cells(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| row.get(col).map(display_value).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

/// Render a JSON scalar the way a table cell shows it
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
