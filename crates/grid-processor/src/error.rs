//! Error types for grid processing.

use thiserror::Error;
use wx_common::WxError;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// Shape mismatch or other grid-level failure.
    #[error(transparent)]
    Grid(#[from] WxError),

    /// An index window does not fit the dimension it is applied to.
    #[error("index window {window} does not fit a dimension of length {len}")]
    WindowOutOfRange { window: String, len: usize },

    /// An index window string could not be parsed.
    #[error("invalid index window '{0}': expected 'start:end' per axis, e.g. '250:-200,700:'")]
    InvalidWindow(String),

    /// A coordinate axis has no usable (non-NaN) values.
    #[error("coordinate axis '{0}' has no usable values")]
    EmptyAxis(&'static str),

    /// Snow-to-liquid ratio must be a positive finite number.
    #[error("invalid snow-to-liquid ratio: {0}")]
    InvalidRatio(f32),
}

/// Result type for grid processing operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
