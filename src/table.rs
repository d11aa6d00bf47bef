//! The tabular result model: one row per input ticker, fixed named columns.

use std::sync::Arc;

use serde_json::Value;

use crate::core::Error;
use crate::registry::MetricKeys;

/// A single table cell: a numeric value, a code/text value, or the
/// missing-value marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value was available for this metric.
    Missing,
    /// A numeric metric value.
    Num(f64),
    /// A textual value, e.g. a currency code.
    Text(String),
}

impl Cell {
    /// Convert a raw JSON scalar into a cell.
    ///
    /// Numbers and strings map directly; null and any structured value are
    /// treated as missing.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(Cell::Missing, Cell::Num),
            Value::String(s) => Cell::Text(s.clone()),
            _ => Cell::Missing,
        }
    }

    /// Whether this is the missing-value marker.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// The numeric value, if this cell holds one.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// The textual value, if this cell holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::Num)
    }
}

/// An ordered sequence of ticker rows over a fixed [`MetricKeys`] column set.
///
/// Rows are index-aligned with the input ticker sequence that produced them:
/// `table.len()` always equals the number of input entries.
#[derive(Debug, Clone)]
pub struct MetricTable {
    keys: Arc<MetricKeys>,
    rows: Vec<Vec<Cell>>,
}

impl MetricTable {
    /// Create an empty table with the given column set.
    pub fn new(keys: MetricKeys) -> Self {
        Self::with_keys(Arc::new(keys))
    }

    pub(crate) fn with_keys(keys: Arc<MetricKeys>) -> Self {
        Self {
            keys,
            rows: Vec::new(),
        }
    }

    /// The column specification of this table.
    pub fn keys(&self) -> &MetricKeys {
        &self.keys
    }

    pub(crate) fn shared_keys(&self) -> Arc<MetricKeys> {
        self.keys.clone()
    }

    /// An empty table sharing this table's column set; the natural
    /// destination for [`crate::normalize::normalize_into`].
    #[must_use]
    pub fn like(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            rows: Vec::new(),
        }
    }

    /// Append a row, cells in column order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnMismatch`] if the row width differs from the
    /// column count.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), Error> {
        if row.len() != self.keys.len() {
            return Err(Error::ColumnMismatch(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.keys.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append an all-missing row.
    pub fn push_missing_row(&mut self) {
        self.rows.push(vec![Cell::Missing; self.keys.len()]);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`, cells in column order.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// The cell at (`row`, `key`).
    pub fn get(&self, row: usize, key: &str) -> Option<&Cell> {
        let col = self.keys.index_of(key)?;
        self.rows.get(row)?.get(col)
    }

    /// Iterate over one column, top to bottom.
    pub fn column<'a>(&'a self, key: &str) -> Option<impl Iterator<Item = &'a Cell>> {
        let col = self.keys.index_of(key)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    pub(crate) fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<Cell>> {
        &mut self.rows
    }
}
