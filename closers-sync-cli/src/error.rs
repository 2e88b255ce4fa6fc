//! CLI error types.

use std::fmt;

use closers_sync::SyncError;

/// Errors that stop the CLI before or around a sync run.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration or arguments
    Config(String),
    /// The install directory prompt failed
    Prompt(String),
    /// Library error outside the sync state machine
    Sync(SyncError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Prompt(msg) => write!(f, "Input error: {}", msg),
            CliError::Sync(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Sync(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SyncError> for CliError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Config(msg) => CliError::Config(msg),
            other => CliError::Sync(other),
        }
    }
}
