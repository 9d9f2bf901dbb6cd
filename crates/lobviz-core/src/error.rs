use thiserror::Error;

use crate::heatmap::BinningError;
use crate::schema::SchemaError;
use crate::table::TableError;

/// Validation and contract errors exposed by `lobviz-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,

    #[error("playback needs at least one frame")]
    EmptyFrames,
    #[error("frame {index} is out of range for {frame_count} frames")]
    FrameOutOfRange { index: usize, frame_count: usize },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failure to read one numeric cell of a row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("column '{column}' is missing or empty")]
    Missing { column: String },
    #[error("column '{column}' is not a number: '{value}'")]
    Malformed { column: String, value: String },
    #[error("column '{column}' must be finite")]
    NonFinite { column: String },
    #[error("column '{column}' must be non-negative")]
    Negative { column: String },
}

impl FieldError {
    /// Missing cells mark the end of the available book depth; everything
    /// else is bad data.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Missing { column }
            | Self::Malformed { column, .. }
            | Self::NonFinite { column }
            | Self::Negative { column } => column,
        }
    }
}

/// Timestamp normalization failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,
    #[error("unrecognized timestamp format: '{value}'")]
    Unrecognized { value: String },
    #[error("timestamp out of range: '{value}'")]
    OutOfRange { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    NotUtc { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Binning(#[from] BinningError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
