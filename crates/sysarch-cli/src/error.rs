//! Error types for the CLI application.

use sysarch_domain::ModelError;
use sysarch_import::ImportError;
use sysarch_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model validation or lookup error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Import error
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),

    /// No project selected and none could be inferred
    #[error("No project selected. Pass --project or set one with 'workspace set'.")]
    NoProject,
}
