//! Read-only inspection of HDF5 table stores.
//!
//! This crate provides the library half of `h5table`:
//!
//! - A [`store::Store`] handle that opens an HDF5 file read-only, lists the
//!   table keys it contains, and resolves keys to tables (`store` module).
//! - A [`table::Table`] abstraction over the two supported table encodings
//!   (columnar groups and packed 2-D matrices) with row counting, head
//!   previews, and clamped row slicing (`table` module).
//! - A small dynamic cell model ([`value::Value`], [`value::ColumnType`],
//!   [`value::RowSet`]) so callers can render rows without knowing the
//!   stored dtypes up front (`value` module).
//! - A `snafu`-based error taxonomy covering unreadable stores, unknown
//!   keys, unavailable row counts, and out-of-range slices (`error` module).
//!
//! All HDF5 parsing is delegated to the `hdf5` crate. Store handles follow
//! scoped acquisition: every public operation opens its own handle and the
//! handle is released on every exit path, including error paths, when it is
//! dropped. Nothing here mutates the inspected file.
//!
//! Row counts are not always cheaply available, so [`table::Table::row_count`]
//! walks an ordered chain of strategies (materialize, metadata attribute,
//! dataspace extent) and reports the last underlying failure when the whole
//! chain is exhausted.
#![deny(missing_docs)]
pub mod error;
pub mod store;
pub mod table;
pub mod value;
