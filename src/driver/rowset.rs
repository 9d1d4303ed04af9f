//! In-memory result set.

use super::error::{DriverError, DriverResult};
use super::types::SqlType;
use super::ResultSet;
use crate::row::Value;

/// A fully materialized result set.
///
/// Drivers that fetch metadata eagerly (like the SQLite driver) hand their
/// rows back through this type. Columns are addressed 1-based.
#[derive(Debug, Clone)]
pub struct RowSet {
    columns: Vec<(String, SqlType)>,
    rows: Vec<Vec<Value>>,
    /// Index of the current row; `None` before the first `next()`.
    cursor: Option<usize>,
    closed: bool,
}

impl RowSet {
    /// Create an empty result set with the given columns.
    pub fn new(columns: Vec<(String, SqlType)>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            cursor: None,
            closed: false,
        }
    }

    /// Create a result set from column names, types and rows.
    ///
    /// Short rows are padded with nulls, as with [`RowSet::push`].
    pub fn with_rows(columns: Vec<(String, SqlType)>, rows: Vec<Vec<Value>>) -> Self {
        let mut rs = Self::new(columns);
        for row in rows {
            rs.push(row);
        }
        rs
    }

    /// Append a row. Short rows are padded with nulls.
    pub fn push(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Number of buffered rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_column(&self, column: usize) -> DriverResult<usize> {
        if column == 0 || column > self.columns.len() {
            return Err(DriverError::ColumnOutOfRange {
                column,
                count: self.columns.len(),
            });
        }
        Ok(column - 1)
    }
}

impl ResultSet for RowSet {
    fn next(&mut self) -> DriverResult<bool> {
        if self.closed {
            return Err(DriverError::ResultSetClosed);
        }
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next.min(self.rows.len()));
        Ok(next < self.rows.len())
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, column: usize) -> DriverResult<&str> {
        let idx = self.check_column(column)?;
        Ok(&self.columns[idx].0)
    }

    fn column_type(&self, column: usize) -> DriverResult<SqlType> {
        let idx = self.check_column(column)?;
        Ok(self.columns[idx].1)
    }

    fn get(&self, column: usize) -> DriverResult<Value> {
        if self.closed {
            return Err(DriverError::ResultSetClosed);
        }
        let idx = self.check_column(column)?;
        let row = self
            .cursor
            .and_then(|c| self.rows.get(c))
            .ok_or(DriverError::NoCurrentRow)?;
        Ok(row.get(idx).cloned().unwrap_or_default())
    }

    fn close(&mut self) -> DriverResult<()> {
        self.closed = true;
        self.rows.clear();
        Ok(())
    }
}
