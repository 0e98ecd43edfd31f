//! Interactive viewer loop.
//!
//! Outer loop prompts for a store path (`q` quits); the inner menu offers
//! table info, table slice, switching files, and exit. Every operation
//! opens its own scoped store handle, and every operation error is printed
//! and control returns to the menu. Only an explicit exit (or EOF) ends
//! the program.

use std::path::{Path, PathBuf};

use rustyline::{error::ReadlineError, DefaultEditor};
use snafu::ResultExt;

use h5table_core::store::{self, Store};

use crate::{
    error::{CliResult, InspectSnafu, InvalidInputSnafu, ReadlineSnafu},
    render,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    TableInfo,
    TableSlice,
    NewFile,
    Exit,
}

impl MenuChoice {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(MenuChoice::TableInfo),
            "2" => Some(MenuChoice::TableSlice),
            "3" => Some(MenuChoice::NewFile),
            "4" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

enum MenuAction {
    NewFile,
    Exit,
}

fn parse_row_arg(field: &'static str, raw: &str) -> CliResult<u64> {
    let trimmed = raw.trim();
    trimmed.parse::<u64>().map_err(|_| {
        InvalidInputSnafu {
            field,
            value: trimmed.to_string(),
        }
        .build()
    })
}

/// Summary info for a store, opened and closed within this call.
fn store_summary(path: &Path) -> CliResult<String> {
    let info = store::store_info(path).context(InspectSnafu {
        path: path.display().to_string(),
    })?;
    Ok(render::render_summary(path, &info))
}

/// Row count, head rows, and dtypes for one table.
fn table_info(path: &Path, key: &str) -> CliResult<String> {
    let ctx = InspectSnafu {
        path: path.display().to_string(),
    };
    let store = Store::open(path).context(ctx.clone())?;
    let table = store.table(key).context(ctx.clone())?;
    let preview = table.preview().context(ctx)?;
    Ok(render::render_preview(table.key(), &preview))
}

/// A clamped `[start, start + count)` row range of one table.
fn table_slice(path: &Path, key: &str, start: u64, count: u64) -> CliResult<String> {
    let ctx = InspectSnafu {
        path: path.display().to_string(),
    };
    let store = Store::open(path).context(ctx.clone())?;
    let table = store.table(key).context(ctx.clone())?;
    let slice = table.slice(start, count).context(ctx)?;
    Ok(render::render_slice(table.key(), &slice))
}

fn print_menu() {
    println!();
    println!("choose an operation:");
    println!("  1. table info (row count, first rows, dtypes)");
    println!("  2. table slice (rows by start/count)");
    println!("  3. choose another file");
    println!("  4. exit");
}

fn read_line(rl: &mut DefaultEditor, prompt: &str) -> CliResult<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => {
            let _ = rl.add_history_entry(line.as_str());
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e).context(ReadlineSnafu),
    }
}

/// Prompts for a store path until one exists; `None` means quit.
fn prompt_file(rl: &mut DefaultEditor) -> CliResult<Option<PathBuf>> {
    loop {
        let line = match read_line(rl, "h5 file path (q to quit): ")? {
            Some(line) => line,
            None => return Ok(None),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        let path = PathBuf::from(trimmed);
        if !path.exists() {
            println!("file does not exist, try again");
            continue;
        }

        return Ok(Some(path));
    }
}

fn prompt_table_key(rl: &mut DefaultEditor) -> CliResult<Option<String>> {
    loop {
        let line = match read_line(rl, "table key (e.g. /t1): ")? {
            Some(line) => line,
            None => return Ok(None),
        };

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
    }
}

fn menu_loop(rl: &mut DefaultEditor, path: &Path) -> CliResult<MenuAction> {
    loop {
        print_menu();
        let line = match read_line(rl, "choice (1-4): ")? {
            Some(line) => line,
            None => return Ok(MenuAction::Exit),
        };

        let choice = match MenuChoice::parse(&line) {
            Some(choice) => choice,
            None => {
                println!("unknown choice, enter 1-4");
                continue;
            }
        };

        match choice {
            MenuChoice::NewFile => return Ok(MenuAction::NewFile),
            MenuChoice::Exit => return Ok(MenuAction::Exit),

            MenuChoice::TableInfo => {
                let key = match prompt_table_key(rl)? {
                    Some(key) => key,
                    None => return Ok(MenuAction::Exit),
                };
                match table_info(path, &key) {
                    Ok(out) => println!("{out}"),
                    Err(e) => println!("{e}"),
                }
            }

            MenuChoice::TableSlice => {
                let key = match prompt_table_key(rl)? {
                    Some(key) => key,
                    None => return Ok(MenuAction::Exit),
                };
                let start_raw = match read_line(rl, "start row (0-based): ")? {
                    Some(line) => line,
                    None => return Ok(MenuAction::Exit),
                };
                let count_raw = match read_line(rl, "row count: ")? {
                    Some(line) => line,
                    None => return Ok(MenuAction::Exit),
                };

                let args = parse_row_arg("start row", &start_raw)
                    .and_then(|start| Ok((start, parse_row_arg("row count", &count_raw)?)));
                let (start, count) = match args {
                    Ok(args) => args,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };

                match table_slice(path, &key, start, count) {
                    Ok(out) => println!("{out}"),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}

/// Runs the viewer until the user exits.
///
/// With `initial` set, the store summary is printed and the menu is entered
/// for that file directly; otherwise the file prompt comes first.
pub fn run_viewer(initial: Option<PathBuf>) -> CliResult<()> {
    let mut rl = DefaultEditor::new().context(ReadlineSnafu)?;

    let mut current = match initial {
        Some(path) => match store_summary(&path) {
            Ok(out) => {
                println!("{out}");
                Some(path)
            }
            Err(e) => {
                println!("{e}");
                None
            }
        },
        None => None,
    };

    loop {
        let path = match current.take() {
            Some(path) => path,
            None => {
                let path = match prompt_file(&mut rl)? {
                    Some(path) => path,
                    None => break,
                };
                match store_summary(&path) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                }
                path
            }
        };

        match menu_loop(&mut rl, &path)? {
            MenuAction::NewFile => continue,
            MenuAction::Exit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use hdf5::types::VarLenUnicode;
    use tempfile::TempDir;

    type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

    fn write_store(dir: &TempDir, rows: usize) -> TestResult<PathBuf> {
        let path = dir.path().join("store.h5");
        let file = hdf5::File::create(&path)?;
        let group = file.create_group("t1")?;

        let ids: Vec<i64> = (0..rows as i64).collect();
        let prices: Vec<f64> = (0..rows).map(|i| i as f64 + 0.5).collect();
        group
            .new_dataset_builder()
            .with_data(ids.as_slice())
            .create("id")?;
        group
            .new_dataset_builder()
            .with_data(prices.as_slice())
            .create("price")?;

        let order: Vec<VarLenUnicode> = ["id", "price"]
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

        Ok(path)
    }

    #[test]
    fn menu_choice_parses_digits_only() {
        assert_eq!(MenuChoice::parse(" 1 "), Some(MenuChoice::TableInfo));
        assert_eq!(MenuChoice::parse("2"), Some(MenuChoice::TableSlice));
        assert_eq!(MenuChoice::parse("3"), Some(MenuChoice::NewFile));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("5"), None);
        assert_eq!(MenuChoice::parse("info"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn parse_row_arg_rejects_non_numeric() {
        assert_eq!(parse_row_arg("start row", " 12 ").unwrap(), 12);

        let err = parse_row_arg("start row", "abc").unwrap_err();
        match err {
            CliError::InvalidInput { field, value } => {
                assert_eq!(field, "start row");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(parse_row_arg("row count", "-1").is_err());
        assert!(parse_row_arg("row count", "1.5").is_err());
    }

    #[test]
    fn table_info_renders_preview() -> TestResult {
        let tmp = TempDir::new()?;
        let path = write_store(&tmp, 10)?;

        let out = table_info(&path, "/t1")?;
        assert!(out.contains("rows: 10"));
        assert!(out.contains("first 5 rows"));
        assert!(out.contains("dtypes"));

        Ok(())
    }

    #[test]
    fn table_info_reports_missing_key() -> TestResult {
        let tmp = TempDir::new()?;
        let path = write_store(&tmp, 3)?;

        let err = table_info(&path, "/nope").unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        Ok(())
    }

    #[test]
    fn table_slice_clamps_and_numbers_rows() -> TestResult {
        let tmp = TempDir::new()?;
        let path = write_store(&tmp, 10)?;

        let out = table_slice(&path, "/t1", 8, 5)?;
        assert!(out.starts_with("rows 8..10 of /t1"));
        assert!(out.contains("9.5"));

        Ok(())
    }

    #[test]
    fn table_slice_past_end_is_out_of_range() -> TestResult {
        let tmp = TempDir::new()?;
        let path = write_store(&tmp, 10)?;

        let err = table_slice(&path, "/t1", 10, 1).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        Ok(())
    }

    #[test]
    fn store_summary_lists_tables() -> TestResult {
        let tmp = TempDir::new()?;
        let path = write_store(&tmp, 2)?;

        let out = store_summary(&path)?;
        assert!(out.contains("tables: /t1"));
        assert!(out.contains("MiB"));

        Ok(())
    }
}
