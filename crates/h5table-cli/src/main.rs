//! Interactive CLI viewer for HDF5 table stores.

mod error;
mod render;
mod shell;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "h5table", about = "Inspect tables stored in HDF5 files")]
struct Cli {
    /// HDF5 store to open on startup (otherwise the viewer prompts)
    #[arg(long)]
    file: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = shell::run_viewer(cli.file) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
