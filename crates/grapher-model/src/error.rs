use thiserror::Error;

/// Errors for API misuse.
///
/// Bad data never ends up here: a cell that fails to parse or compute is
/// stored as an [`ErrorValue`](crate::ErrorValue) instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrapherError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("duplicate column slug: {0}")]
    DuplicateColumn(String),

    #[error("row index {index} out of range for table with {row_count} rows")]
    RowOutOfRange { index: usize, row_count: usize },

    #[error("column {slug} has {actual} values but the table has {expected} rows")]
    LengthMismatch {
        slug: String,
        expected: usize,
        actual: usize,
    },

    #[error("table has no entity column")]
    MissingEntityColumn,

    #[error("table has no time column")]
    MissingTimeColumn,

    #[error("invalid column transform `{expression}`: {message}")]
    InvalidTransform { expression: String, message: String },

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("duplicate dimension: {0}")]
    DuplicateDimension(String),
}

pub type Result<T> = std::result::Result<T, GrapherError>;
