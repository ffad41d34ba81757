//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by the `sobol2d` command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The integration kernel rejected the request or the integrand failed.
    #[error("Integration failed: {0}")]
    Integration(#[from] sobol_kernel::IntegrationError),

    /// A command-line argument is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON output could not be produced.
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}
