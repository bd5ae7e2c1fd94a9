//! Export error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a scene.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Output dimensions are zero or too large to allocate.
    #[error("Invalid export size {0}x{1}")]
    InvalidSize(u32, u32),

    /// Scale factor outside the supported set.
    #[error("Unsupported export scale {0}x (expected 1, 2 or 3)")]
    InvalidScale(u32),

    /// Raster encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// PDF generation failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// Text layout could not be built.
    #[error("Text rendering failed: {0}")]
    Font(String),
}

impl From<png::EncodingError> for ExportError {
    fn from(err: png::EncodingError) -> Self {
        ExportError::Encode(err.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::Encode(err.to_string())
    }
}
