use std::path::Path;

use hdf5::types::VarLenUnicode;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Writes a store with one columnar table `/t1` (`id`, `price`, `name`)
/// carrying both a `column_order` and an `nrows` attribute.
pub fn write_sample_store(path: &Path, rows: usize) -> TestResult {
    let file = hdf5::File::create(path)?;
    let group = file.create_group("t1")?;

    let ids: Vec<i64> = (0..rows as i64).collect();
    let prices: Vec<f64> = (0..rows).map(|i| 100.0 + i as f64 / 4.0).collect();
    let names: Vec<VarLenUnicode> = (0..rows)
        .map(|i| format!("row{i}").parse().unwrap())
        .collect();

    group
        .new_dataset_builder()
        .with_data(ids.as_slice())
        .create("id")?;
    group
        .new_dataset_builder()
        .with_data(prices.as_slice())
        .create("price")?;
    group
        .new_dataset_builder()
        .with_data(names.as_slice())
        .create("name")?;

    let order: Vec<VarLenUnicode> = ["id", "price", "name"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    group
        .new_attr::<VarLenUnicode>()
        .shape(order.len())
        .create("column_order")?
        .write_raw(&order)?;
    group
        .new_attr::<u64>()
        .create("nrows")?
        .write_scalar(&(rows as u64))?;

    Ok(())
}
