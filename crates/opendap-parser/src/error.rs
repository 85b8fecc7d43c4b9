//! Error types for OpenDAP response parsing.

use thiserror::Error;
use wx_common::WxError;

/// Result type for OpenDAP parser operations.
pub type DapResult<T> = Result<T, DapError>;

/// Error types for OpenDAP parsing.
#[derive(Error, Debug)]
pub enum DapError {
    /// Response text does not follow the expected layout
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required variable
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// A block's value count disagrees with its declared shape
    #[error("Variable '{name}' declares {expected} values but has {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A hyperslab that cannot be expressed as a constraint
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error(transparent)]
    Grid(#[from] WxError),
}
