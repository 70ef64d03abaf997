//! Error types for conversion and coercion.

use hestia_model::{ColumnType, ConfigError};
use thiserror::Error;

/// Errors raised while converting or coercing a table.
///
/// None of these are recoverable: a conversion either completes or fails.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The conversion config is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A group needed by the join sequence is absent or has no complete rows.
    #[error("group '{group}' is missing: {reason}")]
    MissingGroup { group: String, reason: &'static str },

    /// A referenced column does not exist.
    #[error("column '{column}' not found ({context})")]
    MissingColumn { column: String, context: String },

    /// A column is claimed by more than one group.
    #[error("column '{column}' matches both group '{first}' and group '{second}'")]
    OverlappingGroups {
        column: String,
        first: String,
        second: String,
    },

    /// A join would produce two columns with the same name.
    #[error("join step {step} would duplicate column '{column}'")]
    DuplicateColumn { step: usize, column: String },

    /// An inner join matched no rows.
    #[error("join step {step} ({left_key} = {right_key}) produced no rows")]
    EmptyJoin {
        step: usize,
        left_key: String,
        right_key: String,
    },

    /// Every join step was skipped.
    #[error("no join step could be executed")]
    NothingJoined,

    /// A value cannot be converted to its declared type.
    #[error("cannot convert '{value}' in column '{column}' (row {row}) to {target}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: String,
        target: ColumnType,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::TypeCoercion {
            column: "cycle.inputs.0.value".to_string(),
            row: 3,
            value: "kg".to_string(),
            target: ColumnType::Float,
        };
        assert_eq!(
            err.to_string(),
            "cannot convert 'kg' in column 'cycle.inputs.0.value' (row 3) to float"
        );
    }
}
