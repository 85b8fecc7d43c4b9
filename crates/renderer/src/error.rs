//! Error types for rendering.

use projection::ProjectionError;
use thiserror::Error;
use wx_common::WxError;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Grid(#[from] WxError),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
