use thiserror::Error;
use super::sql_type::SqlType;

/// Errors surfaced by type mapping, materialization and paginated fetch.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Result metadata describes no convertible columns")]
    EmptySchema,
    #[error("Column '{column}' has unsupported SQL type {sql_type}")]
    UnsupportedColumnType { column: String, sql_type: SqlType },
    #[error("Conversion failed at row {row}, field '{field}': {cause}")]
    ConversionFailed {
        row: usize,
        field: String,
        #[source]
        cause: ValueError,
    },
    #[error("Row source failed after {row} rows: {cause}")]
    SourceExhaustedPrematurely {
        row: usize,
        #[source]
        cause: SourceError,
    },
    #[error("Invalid page size {0}: expected a positive row count or -1")]
    InvalidPageSize(i64),
    #[error("Column count mismatch: expected {expected}, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
    #[error("Row source error: {0}")]
    Source(#[from] SourceError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ConvertError {
    /// True when a source value did not fit its target logical type.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::ConversionFailed { cause: ValueError::OutOfRange { .. }, .. }
        )
    }

    /// Shifts the batch-relative row index carried by row-level errors.
    #[must_use]
    pub fn with_row_offset(self, offset: usize) -> Self {
        match self {
            Self::ConversionFailed { row, field, cause } => Self::ConversionFailed {
                row: row + offset,
                field,
                cause,
            },
            Self::SourceExhaustedPrematurely { row, cause } => Self::SourceExhaustedPrematurely {
                row: row + offset,
                cause,
            },
            other => other,
        }
    }
}

/// Why a single source value could not be appended to its column buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: String },
    #[error("cannot convert {kind} value into {target}")]
    TypeMismatch { kind: &'static str, target: String },
    #[error("null value in non-nullable field")]
    UnexpectedNull,
    #[error("row has no value at column position {0}")]
    MissingColumn(usize),
}

/// Failures reported by a row source or its cursor.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cursor is closed")]
    Closed,
    #[error("Cannot reposition cursor: {0}")]
    Reposition(String),
    #[error("{0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A cursor failed part way through `RowCursor::relative`.
#[derive(Error, Debug)]
#[error("Cursor failed after skipping {skipped} rows: {cause}")]
pub struct SkipError {
    /// Rows skipped before the failure, i.e. the position of the failing row
    pub skipped: usize,
    #[source]
    pub cause: SourceError,
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
