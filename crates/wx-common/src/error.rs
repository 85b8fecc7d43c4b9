//! Error types for grid and parameter handling.

use thiserror::Error;

/// Result type alias using WxError.
pub type WxResult<T> = Result<T, WxError>;

/// Primary error type for grid operations and run parameters.
#[derive(Debug, Error)]
pub enum WxError {
    // === Grid Errors ===
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Grid data length {len} does not match shape {rows}x{cols}")]
    InvalidGridData { rows: usize, cols: usize, len: usize },

    #[error("Index window out of range: {0}")]
    InvalidWindow(String),

    // === Parameter Errors ===
    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

impl From<crate::bbox::BboxParseError> for WxError {
    fn from(err: crate::bbox::BboxParseError) -> Self {
        WxError::InvalidBbox(err.to_string())
    }
}

impl From<crate::time::TimeParseError> for WxError {
    fn from(err: crate::time::TimeParseError) -> Self {
        WxError::InvalidTime(err.to_string())
    }
}
