//! Error taxonomy for store inspection.

use snafu::Snafu;

/// General result type used by store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors produced while inspecting an HDF5 table store.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    /// The file could not be opened as an HDF5 store.
    #[snafu(display("Failed to open HDF5 store at {path}: {source}"))]
    OpenStore {
        /// Path that was passed to the open call.
        path: String,
        /// Underlying HDF5 library error.
        source: hdf5::Error,
    },

    /// The store file exists but its size could not be read.
    #[snafu(display("Failed to stat store file at {path}: {source}"))]
    StoreSize {
        /// Path of the store file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The store's root members could not be listed.
    #[snafu(display("Failed to list tables in store at {path}: {source}"))]
    ListKeys {
        /// Path of the store file.
        path: String,
        /// Underlying HDF5 library error.
        source: hdf5::Error,
    },

    /// The requested key is not present in the store's key set.
    #[snafu(display("Table {key} does not exist in the store"))]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The key exists but does not resolve to a readable table layout.
    #[snafu(display(
        "Table {key} has no readable layout \
         (expected a columnar group or a packed `values` matrix)"
    ))]
    UnknownEncoding {
        /// The key that was resolved.
        key: String,
    },

    /// Every row-count strategy failed for the table.
    #[snafu(display("Unable to determine row count for table {key}: {source}"))]
    RowCountUnavailable {
        /// The table whose row count was requested.
        key: String,
        /// The error raised by the last strategy in the chain.
        #[snafu(source(from(StoreError, Box::new)))]
        source: Box<StoreError>,
    },

    /// A slice was requested starting at or past the end of the table.
    #[snafu(display("Start row {start} is out of range for a table with {row_count} rows"))]
    OutOfRange {
        /// Requested start row.
        start: u64,
        /// Total rows in the table.
        row_count: u64,
    },

    /// A column is stored with a dtype this crate cannot materialize.
    #[snafu(display("Column {column} has unsupported dtype {dtype}"))]
    UnsupportedColumnType {
        /// Name of the offending column.
        column: String,
        /// Debug rendering of the HDF5 type descriptor.
        dtype: String,
    },

    /// An unsigned cell value does not fit the signed 64-bit cell model.
    #[snafu(display("Column {column} holds value {value}, which exceeds i64::MAX"))]
    UnsignedCellTooLarge {
        /// Name of the offending column.
        column: String,
        /// The cell value that overflowed.
        value: u64,
    },

    /// A column dataset could not be opened or read.
    #[snafu(display("Failed to read column {column}: {source}"))]
    ReadColumn {
        /// Name of the column being read.
        column: String,
        /// Underlying HDF5 library error.
        source: hdf5::Error,
    },

    /// A table-level attribute could not be read.
    #[snafu(display("Failed to read attribute {name} on table {key}: {source}"))]
    ReadAttr {
        /// The table carrying the attribute.
        key: String,
        /// Attribute name.
        name: String,
        /// Underlying HDF5 library error.
        source: hdf5::Error,
    },

    /// The columns of a columnar table disagree on their length.
    #[snafu(display("Columns of table {key} disagree on length"))]
    ColumnLengthMismatch {
        /// The table with ragged columns.
        key: String,
    },
}
