//! The measurement table input type (spec.md §3).
//!
//! Row-oriented, header-named cells of arbitrary JSON scalars (numbers or
//! strings), exactly as a decoded spreadsheet/CSV row would arrive at this
//! engine's boundary — decoding itself is out of scope (spec.md §1).

use serde_json::Value;

/// A row-oriented measurement table: a header row plus one `Value` per
/// cell per row, column-aligned with `headers`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names, in table order.
    pub headers: Vec<String>,
    /// Data rows; each row has one cell per header (shorter rows are
    /// treated as trailing empty cells by [`Table::cell`]).
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table from headers and rows.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }

    /// Index of a column by case-insensitive exact name match.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// The cell at `(row, col)`, or `Value::Null` if the row is short.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Value {
        self.rows.get(row).and_then(|r| r.get(col)).cloned().unwrap_or(Value::Null)
    }

    /// Number of data rows (excluding the header).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
