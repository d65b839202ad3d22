//! Rendering errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface data unavailable: {0}")]
    SurfaceData(#[from] cairo::BorrowError),

    #[error("jpeg encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("invalid frame size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
}
