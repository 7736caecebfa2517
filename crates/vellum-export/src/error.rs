//! Export errors and user-facing notices.

use std::fmt;

use vellum_canvas::CanvasError;

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// No drawing surface of the requested size could be created.
    #[error("drawing surface unavailable for {width}x{height} output")]
    SurfaceUnavailable {
        /// Requested output width.
        width: u64,
        /// Requested output height.
        height: u64,
    },

    /// The source image could not be decoded.
    #[error("failed to load source image: {0}")]
    ImageLoad(#[source] image::ImageError),

    /// Encoding the output failed.
    #[error("failed to encode output: {0}")]
    Encode(#[from] image::ImageError),

    /// The export request is malformed.
    #[error("invalid export options: {0}")]
    InvalidOptions(String),

    /// The source payload is empty or not base64.
    #[error(transparent)]
    Payload(CanvasError),
}

impl From<CanvasError> for ExportError {
    fn from(err: CanvasError) -> Self {
        match err {
            CanvasError::ImageDecode(e) => Self::ImageLoad(e),
            other => Self::Payload(other),
        }
    }
}

/// A failure worth showing to the user: which operation, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    /// Short operation name, e.g. `"Export"`.
    pub operation: String,
    /// Human-readable cause.
    pub message: String,
}

impl ErrorNotice {
    /// Build a notice from any error.
    pub fn new(operation: impl Into<String>, err: &impl std::error::Error) -> Self {
        Self {
            operation: operation.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ErrorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}
