use lobviz_core::{BinningError, SchemaError, TableError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Input(#[from] TableError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Binning(#[from] BinningError),

    #[error("command error: {0}")]
    Command(String),

    #[error("invalid log filter '{filter}': {message}")]
    Logging { filter: String, message: String },

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Input(TableError::Csv(_) | TableError::NoHeader) => 2,
            Self::Input(TableError::Open { .. }) => 10,
            Self::Schema(_) => 2,
            Self::Binning(_) => 2,
            Self::Command(_) => 2,
            Self::Logging { .. } => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_categories_to_exit_codes() {
        let missing = CliError::Input(TableError::Open {
            path: String::from("book.csv"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(missing.exit_code(), 10);
        assert_eq!(CliError::Input(TableError::NoHeader).exit_code(), 2);

        let schema = CliError::Schema(SchemaError::MissingColumn {
            column: String::from("bid_01_price"),
        });
        assert_eq!(schema.exit_code(), 2);
        assert_eq!(
            CliError::StrictModeViolation {
                warning_count: 1,
                error_count: 0
            }
            .exit_code(),
            5
        );
    }
}
