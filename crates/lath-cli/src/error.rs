//! Error handling for the lath CLI.
//!
//! Top-level [`CliError`] covers the broad failure categories and converts
//! automatically from the library crates' errors; [`ConfigError`] carries
//! actionable detail for configuration problems. The binary boundary maps
//! everything onto miette reports for rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Staged filesystem failure (missing input, I/O error at commit).
    #[error(transparent)]
    Store(#[from] lath_store::StoreError),

    /// Import graph walking failed.
    #[error(transparent)]
    Graph(#[from] lath_graph::GraphError),

    /// Direct I/O failure outside the store (directory listings).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization of a summary failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}\n\nHint: create a lath.config.json or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// The config file is not valid JSON.
    #[error("Invalid JSON in config file: {0}\n\nHint: check the file with a JSON validator")]
    InvalidJson(#[from] serde_json::Error),

    /// A required field is absent.
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Config field name (camelCase, as written in the file).
        field: String,
        /// How to supply it.
        hint: String,
    },

    /// A field holds a value the generator cannot work with.
    #[error("Invalid value for {field}: {value:?}\n\nHint: {hint}")]
    InvalidValue {
        /// Config field name.
        field: String,
        /// The offending value.
        value: String,
        /// What is expected instead.
        hint: String,
    },
}

/// Convenience result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Convert a CLI error into a miette report for terminal rendering.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Store(e) => miette::miette!("{}", e),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_carries_hint() {
        let err = ConfigError::MissingField {
            field: "packageRoot".to_string(),
            hint: "set packageRoot in lath.config.json or pass --package-root".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("packageRoot"));
        assert!(message.contains("Hint:"));
    }

    #[test]
    fn test_store_error_converts() {
        let err: CliError = lath_store::StoreError::NotFound(PathBuf::from("/missing.js")).into();
        assert!(err.to_string().contains("/missing.js"));
    }
}
