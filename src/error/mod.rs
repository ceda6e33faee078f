use thiserror::Error;

/// Errors raised by matrix, context and range operations.
///
/// Fallible functions in this crate return `anyhow::Result`; the error inside is
/// always one of these variants and can be recovered with
/// `err.downcast_ref::<AlgebraError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("dimension mismatch in {operation}: {left:?} vs {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index ({row}, {column}) out of bounds for {rows}x{columns} matrix")]
    OutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("division by zero")]
    DivisionByZero,
}

impl AlgebraError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AlgebraError::InvalidArgument(message.into())
    }
}
