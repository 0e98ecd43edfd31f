//! Tables, row counting, previews, and row slices.
//!
//! A table is a child group of the store root, stored in one of two
//! encodings:
//!
//! - **Columnar**: one 1-D dataset per column, heterogeneous dtypes. The
//!   group may carry a `column_order` string-array attribute (display
//!   order; sorted dataset names otherwise) and an `nrows` scalar
//!   attribute (record-count metadata).
//! - **Packed**: a single 2-D `f64` dataset named `values` plus a
//!   `columns` string-array attribute naming the columns.
//!
//! Row counts are derived through an ordered strategy chain (see
//! [`Table::row_count`]); the chain order is a compatibility ladder across
//! encodings, not a cost ladder, so the materializing strategy runs first
//! even though the metadata strategy is cheaper. Slices first attempt a
//! ranged (hyperslab) read per column and fall back to materializing the
//! full table and slicing it positionally.

use hdf5::{
    types::{TypeDescriptor, VarLenAscii, VarLenUnicode},
    Dataset, Group,
};
use ndarray::s;
use snafu::{ensure, OptionExt, ResultExt};

use crate::{
    error::{
        ColumnLengthMismatchSnafu, OutOfRangeSnafu, ReadAttrSnafu, ReadColumnSnafu,
        RowCountUnavailableSnafu, StoreResult, UnknownEncodingSnafu, UnsignedCellTooLargeSnafu,
        UnsupportedColumnTypeSnafu,
    },
    value::{Column, ColumnType, RowSet, Value},
};

/// Rows shown by [`Table::preview`].
pub const PREVIEW_ROWS: u64 = 5;

/// Attribute carrying per-table record-count metadata.
const NROWS_ATTR: &str = "nrows";

/// Dataset name of the packed encoding's row matrix.
const PACKED_VALUES: &str = "values";

#[derive(Debug)]
enum Encoding {
    Columnar { columns: Vec<String> },
    Packed { columns: Vec<String> },
}

/// Row count, head rows, and declared column types of one table.
#[derive(Debug, Clone)]
pub struct TablePreview {
    /// Total rows, derived via the fallback chain.
    pub row_count: u64,
    /// The first `min(5, row_count)` rows.
    pub head: RowSet,
    /// Per-column declared types, in column order.
    pub dtypes: Vec<(String, ColumnType)>,
}

/// A contiguous `[start, end)` range of rows read from a table.
#[derive(Debug, Clone)]
pub struct RowSlice {
    /// First row of the slice (inclusive).
    pub start: u64,
    /// End of the slice (exclusive), clamped to the table's row count.
    pub end: u64,
    /// The materialized rows of the range.
    pub rows: RowSet,
}

/// A resolved table inside an open store.
#[derive(Debug)]
pub struct Table {
    key: String,
    group: Group,
    encoding: Encoding,
}

impl Table {
    pub(crate) fn resolve(key: String, group: Group) -> StoreResult<Table> {
        let encoding = if group.link_exists(PACKED_VALUES) {
            // A `values` dataset without a `columns` attribute only looks packed.
            let columns = match try_read_string_list_attr(&group, &key, "columns")? {
                Some(columns) => columns,
                None => return UnknownEncodingSnafu { key }.fail(),
            };
            Encoding::Packed { columns }
        } else {
            let columns = match try_read_string_list_attr(&group, &key, "column_order")? {
                Some(order) => order,
                None => {
                    let mut names: Vec<String> = group
                        .member_names()
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|name| group.dataset(name).is_ok())
                        .collect();
                    names.sort();
                    names
                }
            };
            ensure!(!columns.is_empty(), UnknownEncodingSnafu { key: key.clone() });
            Encoding::Columnar { columns }
        };

        Ok(Table {
            key,
            group,
            encoding,
        })
    }

    /// The table's key, with a leading `/`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Column names in display order.
    pub fn columns(&self) -> &[String] {
        match &self.encoding {
            Encoding::Columnar { columns } | Encoding::Packed { columns } => columns,
        }
    }

    /// Per-column declared types, in column order.
    pub fn dtypes(&self) -> StoreResult<Vec<(String, ColumnType)>> {
        match &self.encoding {
            Encoding::Packed { columns } => Ok(columns
                .iter()
                .map(|name| (name.clone(), ColumnType::Float))
                .collect()),
            Encoding::Columnar { columns } => columns
                .iter()
                .map(|name| {
                    let ds = self.column_dataset(name)?;
                    Ok((name.clone(), column_type(&ds, name)?))
                })
                .collect(),
        }
    }

    /// Row count via the ordered fallback chain, first success wins:
    ///
    /// 1. materialize the full table and take its length;
    /// 2. read the `nrows` metadata attribute;
    /// 3. take the row dimension of a full-range selection over the
    ///    anchor dataset.
    ///
    /// When every strategy fails the result is
    /// [`crate::error::StoreError::RowCountUnavailable`] carrying the last
    /// strategy's error as its source.
    pub fn row_count(&self) -> StoreResult<u64> {
        let mut last_err = match self.count_by_materialize() {
            Ok(n) => return Ok(n),
            Err(err) => {
                tracing::debug!(table = %self.key, error = %err, "materialize row-count strategy failed");
                err
            }
        };

        match self.count_by_metadata() {
            Ok(n) => return Ok(n),
            Err(err) => {
                tracing::debug!(table = %self.key, error = %err, "metadata row-count strategy failed");
                last_err = err;
            }
        }

        match self.count_by_extent() {
            Ok(n) => return Ok(n),
            Err(err) => {
                tracing::debug!(table = %self.key, error = %err, "extent row-count strategy failed");
                last_err = err;
            }
        }

        Err(last_err).context(RowCountUnavailableSnafu {
            key: self.key.clone(),
        })
    }

    /// Strategy 1: read every column in full and count the rows.
    pub fn count_by_materialize(&self) -> StoreResult<u64> {
        self.read_all().map(|rows| rows.rows.len() as u64)
    }

    /// Strategy 2: read the table's `nrows` attribute. No row data is read.
    pub fn count_by_metadata(&self) -> StoreResult<u64> {
        let ctx = ReadAttrSnafu {
            key: self.key.clone(),
            name: NROWS_ATTR.to_string(),
        };
        let attr = self.group.attr(NROWS_ATTR).context(ctx.clone())?;
        attr.read_scalar::<u64>().context(ctx)
    }

    /// Strategy 3: the row dimension of the anchor dataset's full extent.
    pub fn count_by_extent(&self) -> StoreResult<u64> {
        let ds = self.anchor_dataset()?;
        Ok(ds.shape().first().copied().unwrap_or(0) as u64)
    }

    /// Row count, head rows (at most [`PREVIEW_ROWS`]), and dtypes.
    pub fn preview(&self) -> StoreResult<TablePreview> {
        let row_count = self.row_count()?;
        let head_rows = row_count.min(PREVIEW_ROWS) as usize;
        let head = if head_rows == 0 {
            RowSet::empty(self.columns().to_vec())
        } else {
            self.read_rows(0, head_rows)?
        };

        Ok(TablePreview {
            row_count,
            head,
            dtypes: self.dtypes()?,
        })
    }

    /// Reads rows `[start, min(start + count, row_count))`.
    ///
    /// Fails with [`crate::error::StoreError::OutOfRange`] when
    /// `start >= row_count`; in that case nothing is read. `count` may
    /// exceed the remaining rows, the range is clamped.
    pub fn slice(&self, start: u64, count: u64) -> StoreResult<RowSlice> {
        let row_count = self.row_count()?;
        ensure!(start < row_count, OutOfRangeSnafu { start, row_count });

        let end = start.saturating_add(count).min(row_count);
        let rows = self.read_rows(start as usize, end as usize)?;

        Ok(RowSlice { start, end, rows })
    }

    /// Ranged read with fallback to a positional slice of the full table.
    fn read_rows(&self, start: usize, end: usize) -> StoreResult<RowSet> {
        match self.read_range(start, end) {
            Ok(rows) => Ok(rows),
            Err(err) => {
                tracing::debug!(
                    table = %self.key,
                    error = %err,
                    "ranged read failed; slicing the materialized table instead"
                );
                Ok(self.read_all()?.window(start, end))
            }
        }
    }

    fn read_all(&self) -> StoreResult<RowSet> {
        match &self.encoding {
            Encoding::Columnar { columns } => self.read_columnar(columns, None),
            Encoding::Packed { columns } => {
                let ds = self.packed_dataset()?;
                let arr = ds
                    .read_2d::<f64>()
                    .context(ReadColumnSnafu {
                        column: PACKED_VALUES.to_string(),
                    })?;
                self.packed_rowset(columns, arr)
            }
        }
    }

    fn read_range(&self, start: usize, end: usize) -> StoreResult<RowSet> {
        match &self.encoding {
            Encoding::Columnar { columns } => self.read_columnar(columns, Some((start, end))),
            Encoding::Packed { columns } => {
                let ds = self.packed_dataset()?;
                let arr = ds
                    .read_slice_2d::<f64, _>(s![start..end, ..])
                    .context(ReadColumnSnafu {
                        column: PACKED_VALUES.to_string(),
                    })?;
                self.packed_rowset(columns, arr)
            }
        }
    }

    fn read_columnar(
        &self,
        columns: &[String],
        range: Option<(usize, usize)>,
    ) -> StoreResult<RowSet> {
        let mut data = Vec::with_capacity(columns.len());
        for name in columns {
            let ds = self.column_dataset(name)?;
            data.push(read_column(&ds, name, range)?);
        }
        RowSet::from_columns(&self.key, columns.to_vec(), data)
    }

    fn packed_rowset(&self, columns: &[String], arr: ndarray::Array2<f64>) -> StoreResult<RowSet> {
        ensure!(
            arr.ncols() == columns.len(),
            ColumnLengthMismatchSnafu {
                key: self.key.clone()
            }
        );

        let rows = arr
            .outer_iter()
            .map(|row| row.iter().map(|v| Value::Float(*v)).collect())
            .collect();

        Ok(RowSet {
            columns: columns.to_vec(),
            rows,
        })
    }

    fn column_dataset(&self, name: &str) -> StoreResult<Dataset> {
        self.group.dataset(name).context(ReadColumnSnafu {
            column: name.to_string(),
        })
    }

    fn packed_dataset(&self) -> StoreResult<Dataset> {
        self.group.dataset(PACKED_VALUES).context(ReadColumnSnafu {
            column: PACKED_VALUES.to_string(),
        })
    }

    fn anchor_dataset(&self) -> StoreResult<Dataset> {
        match &self.encoding {
            Encoding::Packed { .. } => self.packed_dataset(),
            Encoding::Columnar { columns } => {
                // resolve() guarantees at least one column.
                self.column_dataset(&columns[0])
            }
        }
    }
}

/// Absent attributes are not an error here; a present-but-unreadable one is.
fn try_read_string_list_attr(
    group: &Group,
    key: &str,
    name: &str,
) -> StoreResult<Option<Vec<String>>> {
    let attr = match group.attr(name) {
        Ok(attr) => attr,
        Err(_) => return Ok(None),
    };

    let values = attr.read_raw::<VarLenUnicode>().context(ReadAttrSnafu {
        key: key.to_string(),
        name: name.to_string(),
    })?;
    Ok(Some(values.iter().map(|v| v.to_string()).collect()))
}

fn column_type(ds: &Dataset, name: &str) -> StoreResult<ColumnType> {
    let ctx = ReadColumnSnafu {
        column: name.to_string(),
    };
    let descriptor = ds
        .dtype()
        .context(ctx.clone())?
        .to_descriptor()
        .context(ctx)?;

    match descriptor {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => Ok(ColumnType::Int),
        TypeDescriptor::Float(_) => Ok(ColumnType::Float),
        TypeDescriptor::Boolean => Ok(ColumnType::Bool),
        TypeDescriptor::VarLenAscii | TypeDescriptor::VarLenUnicode => Ok(ColumnType::Text),
        other => UnsupportedColumnTypeSnafu {
            column: name.to_string(),
            dtype: format!("{other:?}"),
        }
        .fail(),
    }
}

fn read_column(ds: &Dataset, name: &str, range: Option<(usize, usize)>) -> StoreResult<Column> {
    match column_type(ds, name)? {
        ColumnType::Float => Ok(Column::Float(read_vec::<f64>(ds, name, range)?)),
        ColumnType::Bool => Ok(Column::Bool(read_vec::<bool>(ds, name, range)?)),
        ColumnType::Text => {
            let ctx = ReadColumnSnafu {
                column: name.to_string(),
            };
            let descriptor = ds
                .dtype()
                .context(ctx.clone())?
                .to_descriptor()
                .context(ctx)?;
            let values = if matches!(descriptor, TypeDescriptor::VarLenAscii) {
                read_vec::<VarLenAscii>(ds, name, range)?
                    .iter()
                    .map(|v| v.to_string())
                    .collect()
            } else {
                read_vec::<VarLenUnicode>(ds, name, range)?
                    .iter()
                    .map(|v| v.to_string())
                    .collect()
            };
            Ok(Column::Text(values))
        }
        ColumnType::Int => {
            let ctx = ReadColumnSnafu {
                column: name.to_string(),
            };
            let descriptor = ds
                .dtype()
                .context(ctx.clone())?
                .to_descriptor()
                .context(ctx)?;
            if matches!(descriptor, TypeDescriptor::Unsigned(_)) {
                let raw = read_vec::<u64>(ds, name, range)?;
                let mut values = Vec::with_capacity(raw.len());
                for v in raw {
                    let cell = i64::try_from(v).ok().context(UnsignedCellTooLargeSnafu {
                        column: name.to_string(),
                        value: v,
                    })?;
                    values.push(cell);
                }
                Ok(Column::Int(values))
            } else {
                Ok(Column::Int(read_vec::<i64>(ds, name, range)?))
            }
        }
    }
}

fn read_vec<T: hdf5::H5Type + Clone>(
    ds: &Dataset,
    name: &str,
    range: Option<(usize, usize)>,
) -> StoreResult<Vec<T>> {
    let result = match range {
        None => ds.read_raw::<T>(),
        Some((start, end)) => ds
            .read_slice_1d::<T, _>(s![start..end])
            .map(|arr| arr.to_vec()),
    };

    result.context(ReadColumnSnafu {
        column: name.to_string(),
    })
}
