//! Dynamic cell and column model for materialized rows.
//!
//! Stored dtypes are only known at runtime, so reads surface data through a
//! small value enum instead of generic typed arrays. Renderers downstream
//! only ever need `Display` on cells and the declared [`ColumnType`] per
//! column.

use std::fmt;

use crate::error::{ColumnLengthMismatchSnafu, StoreResult};

/// A single cell value read from a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer cell (unsigned columns widen into this when they fit).
    Int(i64),
    /// Floating-point cell.
    Float(f64),
    /// Boolean cell.
    Bool(bool),
    /// Variable-length string cell.
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Declared type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Signed or unsigned integer storage.
    Int,
    /// Floating-point storage.
    Float,
    /// Boolean storage.
    Bool,
    /// Variable-length string storage.
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
            ColumnType::Text => "text",
        };
        f.write_str(name)
    }
}

/// One fully materialized column.
#[derive(Debug, Clone)]
pub enum Column {
    /// Integer column.
    Int(Vec<i64>),
    /// Float column.
    Float(Vec<f64>),
    /// Boolean column.
    Bool(Vec<bool>),
    /// String column.
    Text(Vec<String>),
}

impl Column {
    /// Number of cells in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// True when the column holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared type of the column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int(_) => ColumnType::Int,
            Column::Float(_) => ColumnType::Float,
            Column::Bool(_) => ColumnType::Bool,
            Column::Text(_) => ColumnType::Text,
        }
    }

    fn value_at(&self, idx: usize) -> Value {
        match self {
            Column::Int(v) => Value::Int(v[idx]),
            Column::Float(v) => Value::Float(v[idx]),
            Column::Bool(v) => Value::Bool(v[idx]),
            Column::Text(v) => Value::Text(v[idx].clone()),
        }
    }
}

/// A rectangular set of materialized rows with their column names.
#[derive(Debug, Clone)]
pub struct RowSet {
    /// Column names in display order.
    pub columns: Vec<String>,
    /// Row-major cell values; every row has one cell per column.
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Assembles rows from typed columns, rejecting ragged input.
    ///
    /// `key` only feeds the error message when lengths disagree.
    pub fn from_columns(key: &str, names: Vec<String>, columns: Vec<Column>) -> StoreResult<Self> {
        let nrows = columns.first().map(Column::len).unwrap_or(0);
        snafu::ensure!(
            columns.iter().all(|c| c.len() == nrows),
            ColumnLengthMismatchSnafu { key: key.to_string() }
        );

        let mut rows = Vec::with_capacity(nrows);
        for idx in 0..nrows {
            rows.push(columns.iter().map(|c| c.value_at(idx)).collect());
        }

        Ok(RowSet {
            columns: names,
            rows,
        })
    }

    /// A `RowSet` with the given columns and no rows.
    pub fn empty(columns: Vec<String>) -> Self {
        RowSet {
            columns,
            rows: Vec::new(),
        }
    }

    /// Positional window `[start, end)`, clamped to the available rows.
    pub fn window(&self, start: usize, end: usize) -> RowSet {
        let start = start.min(self.rows.len());
        let end = end.clamp(start, self.rows.len());
        RowSet {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_columns_assembles_row_major() {
        let rs = RowSet::from_columns(
            "/t",
            vec!["id".into(), "price".into()],
            vec![
                Column::Int(vec![1, 2]),
                Column::Float(vec![1.5, 2.5]),
            ],
        )
        .unwrap();

        assert_eq!(rs.rows.len(), 2);
        assert_eq!(rs.rows[0], vec![Value::Int(1), Value::Float(1.5)]);
        assert_eq!(rs.rows[1], vec![Value::Int(2), Value::Float(2.5)]);
    }

    #[test]
    fn from_columns_rejects_ragged_columns() {
        let err = RowSet::from_columns(
            "/t",
            vec!["a".into(), "b".into()],
            vec![Column::Int(vec![1, 2]), Column::Int(vec![1])],
        )
        .unwrap_err();

        assert!(err.to_string().contains("disagree on length"));
    }

    #[test]
    fn window_clamps_to_available_rows() {
        let rs = RowSet::from_columns(
            "/t",
            vec!["a".into()],
            vec![Column::Int(vec![0, 1, 2, 3])],
        )
        .unwrap();

        let w = rs.window(3, 10);
        assert_eq!(w.rows.len(), 1);
        assert_eq!(w.rows[0], vec![Value::Int(3)]);

        let w = rs.window(9, 12);
        assert!(w.rows.is_empty());
    }

    #[test]
    fn value_display_is_plain() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Text("abc".into()).to_string(), "abc");
        assert_eq!(ColumnType::Text.to_string(), "text");
    }
}
