//! CLI error types.

use thiserror::Error;

use slope_optim::OptimError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A comma-separated vector could not be parsed.
    #[error("Invalid vector '{input}': {reason}")]
    InvalidVector { input: String, reason: String },

    /// The data file is unusable.
    #[error("Invalid data on line {line}: {reason}")]
    InvalidData { line: usize, reason: String },

    /// The optimizer rejected the configuration or failed mid-run.
    #[error(transparent)]
    Optim(#[from] OptimError),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
