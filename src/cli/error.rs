//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Json { .. } => exitcode::DATAERR,
                InfraError::Application(e) => match e {
                    ApplicationError::Domain(d) => match d {
                        DomainError::Validation(_)
                        | DomainError::InvalidDocument(_)
                        | DomainError::Cycle { .. } => exitcode::DATAERR,
                        DomainError::NotFound { .. } => exitcode::NOINPUT,
                    },
                    ApplicationError::Forbidden(_) => exitcode::NOPERM,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                },
            },
        }
    }

    /// Schema violations to list below the error line, if any.
    pub fn violations(&self) -> &[crate::domain::SchemaViolation] {
        match self {
            CliError::Infra(InfraError::Application(ApplicationError::Domain(
                DomainError::InvalidDocument(violations),
            ))) => violations,
            _ => &[],
        }
    }
}
