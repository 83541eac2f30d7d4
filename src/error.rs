//! # Error Types
//!
//! This module defines the error type used throughout the labelrender library.
//!
//! ## Taxonomy
//!
//! | Variant | Meaning | Recoverable |
//! |---------|---------|-------------|
//! | `InvalidArgument` | Caller broke a contract (bad input reference) | No |
//! | `UnsupportedGeometry` | Shape cannot be expressed by the backend | No |
//! | `Unsupported` | Backend does not implement the operation at all | No |
//! | `FontSizeOutOfRange` | Text smaller than the smallest device font | No |
//! | `Image` | Embedded image bytes could not be decoded | No |
//! | `Config` | Invalid render configuration | No |
//!
//! A missing image is *not* an error: image sources return `None` and the
//! translators emit nothing for that node.

use thiserror::Error;

/// Main error type for labelrender operations
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required input was absent or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The transformed geometry falls into a case the backend cannot draw
    #[error("Unsupported geometry in {backend} {shape} translation: {detail}")]
    UnsupportedGeometry {
        backend: &'static str,
        shape: &'static str,
        detail: String,
    },

    /// The backend does not implement this operation
    #[error("{backend} does not support {operation}")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },

    /// Requested text size is below the smallest representable device font
    #[error("font size must be greater than {minimum} (got {size})")]
    FontSizeOutOfRange { size: f32, minimum: u32 },

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, RenderError>;

impl RenderError {
    /// Shorthand for the "diagonal case is not implemented" stops.
    pub(crate) fn diagonal(backend: &'static str, shape: &'static str, start: (f32, f32), end: (f32, f32)) -> Self {
        RenderError::UnsupportedGeometry {
            backend,
            shape,
            detail: format!(
                "non-axis-aligned segment from ({}, {}) to ({}, {})",
                start.0, start.1, end.0, end.1
            ),
        }
    }
}
