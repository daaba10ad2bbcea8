//! Error handling for the shoutscope CLI

use thiserror::Error;

use crate::config::ConfigError;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("shoutscope core error: {0}")]
    Core(#[from] shoutscope_core::ShoutscopeError),

    #[error("Overlay error: {0}")]
    Overlay(#[from] shoutscope_core::OverlayError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or incomplete REPL input
    #[error("{0}")]
    Usage(String),

    /// Lookup of a peer or group that is not on the network
    #[error("{0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Whether the REPL has to give up after this error
    ///
    /// Input and lookup errors only concern the line that caused them. A core
    /// channel error means the watch task is gone.
    pub fn is_fatal(&self) -> bool {
        match self {
            CliError::Core(e) => e.is_unrecoverable(),
            CliError::Io(_) => true,
            _ => false,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        // Keep the whole context chain
        CliError::Config(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoutscope_core::{OverlayError, ShoutscopeError};

    #[test]
    fn test_fatal_classification() {
        assert!(!CliError::Usage("usage: node info <uuid>".to_string()).is_fatal());
        assert!(!CliError::NotFound("No group named x".to_string()).is_fatal());
        assert!(!CliError::Overlay(OverlayError::Shutdown).is_fatal());
        assert!(CliError::Core(ShoutscopeError::channel_error("closed")).is_fatal());
    }

    #[test]
    fn test_anyhow_context_is_kept() {
        let err = anyhow::Error::new(ConfigError::FileSystem("missing".to_string()))
            .context("Failed to load configuration file shoutscope.toml");

        assert_eq!(
            CliError::from(err).to_string(),
            "Configuration error: Failed to load configuration file shoutscope.toml: File system error: missing"
        );
    }

    #[test]
    fn test_usage_displays_bare_message() {
        let err = CliError::NotFound("Peer P1 does not exist".to_string());
        assert_eq!(err.to_string(), "Peer P1 does not exist");
    }
}
