//! Error types for the clone and list workflows

use crate::aws::AwsError;
use thiserror::Error;

/// Errors raised by the role cloner workflows.
///
/// Configuration, credential and selection errors abort a `clone` run.
/// Per-role failures during execution are recorded in a
/// [`CloneOutcome`](crate::CloneOutcome) instead of being returned.
#[derive(Error, Debug)]
pub enum RoleClonerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Credential validation failed: {0}")]
    Credentials(String),

    #[error("Invalid selection: {0}")]
    Selection(String),

    #[error("destination role already exists: {0}")]
    RoleAlreadyExists(String),

    #[error("Operation cancelled - {0}")]
    Cancelled(String),

    #[error(transparent)]
    Aws(#[from] AwsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RoleClonerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    pub fn selection(message: impl Into<String>) -> Self {
        Self::Selection(message.into())
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled(message.into())
    }
}

pub type RoleClonerResult<T> = Result<T, RoleClonerError>;
