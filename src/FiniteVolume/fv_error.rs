use thiserror::Error;

/// error types of the finite volume layer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FvError {
    #[error("Dimension mismatch: expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Non-finite value: {0}")]
    NonFiniteValue(String),
}
