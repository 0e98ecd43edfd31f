use h5table_core::error::StoreError;
use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("Failed to inspect {path}: {source}"))]
    Inspect {
        path: String,
        #[snafu(source(from(StoreError, Box::new)))]
        source: Box<StoreError>,
    },

    #[snafu(display("Invalid {field} '{value}': expected a non-negative integer"))]
    InvalidInput { field: &'static str, value: String },

    #[snafu(display("Failed to read input: {source}"))]
    Readline {
        source: rustyline::error::ReadlineError,
    },
}
