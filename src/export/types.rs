//! Error types for image export.

use thiserror::Error;

use crate::draw::RenderError;

/// Errors that can occur while exporting the annotated image.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to render image for export: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] cairo::IoError),

    #[error("Converting the canvas to an image produced no data")]
    EmptyImage,

    #[error("Export task failed: {0}")]
    Task(String),

    #[error("Failed to save image: {0}")]
    SaveError(#[from] std::io::Error),
}
