//! CLI error type.

use crate::config::ConfigError;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Library error (transport setup, session I/O, agent run).
    #[error(transparent)]
    Converse(#[from] converse::Error),

    /// Building the runtime or another local resource failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<converse::TransportError> for CliError {
    fn from(err: converse::TransportError) -> Self {
        Self::Converse(err.into())
    }
}
