//! Read-only store handles and key listing.
//!
//! A store is one HDF5 file containing zero or more named tables. Handles
//! are opened read-only and follow scoped acquisition: [`store_info`] and
//! the CLI open a fresh [`Store`] per operation and drop it before control
//! returns to the caller, on success and error paths alike.
//!
//! Keys are reported pandas-style with a leading `/` and matched with or
//! without it on input.

use std::path::{Path, PathBuf};

use snafu::ResultExt;

use crate::{
    error::{KeyNotFoundSnafu, ListKeysSnafu, OpenStoreSnafu, StoreResult, StoreSizeSnafu},
    table::Table,
};

/// Summary of a store: its size on disk and the table keys it holds.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    /// Size of the store file in bytes.
    pub file_size_bytes: u64,
    /// Keys of every table in the store, sorted, with a leading `/`.
    pub table_keys: Vec<String>,
}

/// An open, read-only handle to an HDF5 table store.
#[derive(Debug)]
pub struct Store {
    file: hdf5::File,
    path: PathBuf,
}

impl Store {
    /// Opens the file at `path` read-only.
    ///
    /// Fails with [`crate::error::StoreError::OpenStore`] when the path is
    /// missing, unreadable, or not valid HDF5. The handle is released when
    /// the `Store` is dropped.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = hdf5::File::open(&path).context(OpenStoreSnafu {
            path: path.display().to_string(),
        })?;

        tracing::debug!(path = %path.display(), "opened store read-only");
        Ok(Store { file, path })
    }

    /// Path this store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the store file in bytes.
    pub fn file_size_bytes(&self) -> StoreResult<u64> {
        let meta = std::fs::metadata(&self.path).context(StoreSizeSnafu {
            path: self.path.display().to_string(),
        })?;
        Ok(meta.len())
    }

    /// Sorted keys of every table in the store.
    ///
    /// Only root-level groups count as tables; loose datasets at the root
    /// are not listed. An empty store yields an empty vector, not an error.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let members = self.file.member_names().context(ListKeysSnafu {
            path: self.path.display().to_string(),
        })?;

        let mut keys: Vec<String> = members
            .into_iter()
            .filter(|name| self.file.group(name).is_ok())
            .map(|name| format!("/{name}"))
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Resolves `key` to a table handle.
    ///
    /// The key is checked against the store's key set before any read;
    /// unknown keys fail with [`crate::error::StoreError::KeyNotFound`].
    pub fn table(&self, key: &str) -> StoreResult<Table> {
        let name = key.strip_prefix('/').unwrap_or(key);
        let display_key = format!("/{name}");

        if name.is_empty() || !self.file.link_exists(name) {
            return KeyNotFoundSnafu { key: display_key }.fail();
        }

        let group = match self.file.group(name) {
            Ok(group) => group,
            // Present but not a group: a loose dataset is not a table.
            Err(_) => return KeyNotFoundSnafu { key: display_key }.fail(),
        };

        Table::resolve(display_key, group)
    }

    /// Summary info for this store.
    pub fn info(&self) -> StoreResult<StoreInfo> {
        Ok(StoreInfo {
            file_size_bytes: self.file_size_bytes()?,
            table_keys: self.keys()?,
        })
    }
}

/// Opens the store at `path`, collects its [`StoreInfo`], and closes it.
pub fn store_info(path: impl AsRef<Path>) -> StoreResult<StoreInfo> {
    let store = Store::open(path)?;
    store.info()
}
