//! Text rendering for store summaries, previews, and slices.

use std::path::Path;

use tabled::{builder::Builder, settings::Style};

use h5table_core::{
    store::StoreInfo,
    table::{RowSlice, TablePreview},
    value::{ColumnType, RowSet},
};

/// Renders a `RowSet` as a bordered table with an absolute row-index
/// column. `first_row` is the index of the first rendered row.
pub fn render_rows(rows: &RowSet, first_row: u64) -> String {
    let mut builder = Builder::default();

    let mut header = Vec::with_capacity(rows.columns.len() + 1);
    header.push("row".to_string());
    header.extend(rows.columns.iter().cloned());
    builder.push_record(header);

    for (offset, row) in rows.rows.iter().enumerate() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push((first_row + offset as u64).to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn render_dtypes(dtypes: &[(String, ColumnType)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["column", "dtype"]);
    for (name, ty) in dtypes {
        builder.push_record([name.clone(), ty.to_string()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Bytes as mebibytes with two decimals, raw count alongside.
pub fn format_file_size(bytes: u64) -> String {
    let mib = bytes as f64 / (1024.0 * 1024.0);
    format!("{mib:.2} MiB ({bytes} bytes)")
}

pub fn render_summary(path: &Path, info: &StoreInfo) -> String {
    let tables = if info.table_keys.is_empty() {
        "(none)".to_string()
    } else {
        info.table_keys.join(", ")
    };

    format!(
        "store: {}\nfile size: {}\ntables: {tables}",
        path.display(),
        format_file_size(info.file_size_bytes),
    )
}

pub fn render_preview(key: &str, preview: &TablePreview) -> String {
    let head = if preview.head.rows.is_empty() {
        "(no rows)".to_string()
    } else {
        render_rows(&preview.head, 0)
    };

    format!(
        "table: {key}\nrows: {}\n\nfirst {} rows:\n{head}\n\ndtypes:\n{}",
        preview.row_count,
        preview.head.rows.len(),
        render_dtypes(&preview.dtypes),
    )
}

pub fn render_slice(key: &str, slice: &RowSlice) -> String {
    let body = if slice.rows.rows.is_empty() {
        "(no rows)".to_string()
    } else {
        render_rows(&slice.rows, slice.start)
    };

    format!(
        "rows {}..{} of {key}:\n{body}",
        slice.start, slice.end
    )
}
