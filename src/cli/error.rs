//! CLI-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("no such record file: {}", .0.display())]
    NoInput(PathBuf),

    #[error("item not found: {0}")]
    NotFound(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NoInput(_) => crate::exitcode::NOINPUT,
            CliError::NotFound(_) => crate::exitcode::DATAERR,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Records { .. } => crate::exitcode::DATAERR,
                ApplicationError::Domain(DomainError::DuplicateId(_)) => crate::exitcode::DATAERR,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                ApplicationError::Serialize(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}
