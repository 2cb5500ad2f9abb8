//! Error types for table reshaping.

use thiserror::Error;

use crate::resolution::ParseResolutionError;

/// Errors that can occur while converting between table layouts.
#[derive(Debug, Error)]
pub enum ReshapeError {
    // === Input Contract Errors ===
    /// No time column and no timestamp index to derive one from.
    #[error("column '{time_id}' not found and the row index is not a timestamp sequence; supply time_id or use a datetime index")]
    MissingTimeKey { time_id: String },

    /// Column not found in the input table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// The same `(group, time)` pair occurs more than once.
    #[error("duplicate observation for group {group} at time {time}")]
    DuplicateObservation { group: String, time: String },

    /// Row index length does not match the table height.
    #[error("row index has {actual} entries but the table has {expected} rows")]
    IndexLength { expected: usize, actual: usize },

    /// Hierarchical table has the wrong number of levels or ragged columns.
    #[error("unexpected table shape: {message}")]
    Shape { message: String },

    // === Configuration Errors ===
    /// Resolution string could not be parsed.
    #[error("invalid resolution: {0}")]
    Resolution(#[from] ParseResolutionError),

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    Polars { message: String },
}

impl ReshapeError {
    /// Build a [`ReshapeError::Shape`] from a message.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for ReshapeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Polars {
            message: err.to_string(),
        }
    }
}

/// Result type for reshape operations.
pub type Result<T> = std::result::Result<T, ReshapeError>;
