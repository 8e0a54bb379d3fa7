//! CLI-level errors (wraps tree errors)

use thiserror::Error;

use crate::errors::TreeError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Tree(e) => match e {
                TreeError::FileNotFound(_) => exitcode::NOINPUT,
                TreeError::FileReadError(_) | TreeError::PathResolution { .. } => {
                    exitcode::IOERR
                }
                TreeError::InvalidPath { .. }
                | TreeError::EmptySegment(_)
                | TreeError::PathNotFound(_) => exitcode::DATAERR,
                TreeError::Config(_) => exitcode::CONFIG,
            },
        }
    }
}
