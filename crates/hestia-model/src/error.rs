//! Error types for conversion configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::ConversionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration JSON could not be parsed.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No group filters were declared.
    #[error("config declares no column groups")]
    NoGroups,

    /// Two group filters share a name.
    #[error("group '{name}' is declared more than once")]
    DuplicateGroup { name: String },

    /// A group pattern is not a valid regular expression.
    #[error("invalid pattern for group '{group}': {source}")]
    InvalidPattern {
        group: String,
        #[source]
        source: regex::Error,
    },

    /// A join step references a group that is not declared.
    #[error("join step {step} references unknown group '{group}'")]
    UnknownGroup { step: usize, group: String },

    /// No join steps were declared.
    #[error("config declares no join steps")]
    NoJoins,

    /// The first join step has nothing merged to join against.
    #[error("join step 1 cannot use the merged result as its left side")]
    MergedBeforeFirstJoin,

    /// A required text field is empty.
    #[error("config field '{field}' must not be empty")]
    EmptyField { field: &'static str },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
