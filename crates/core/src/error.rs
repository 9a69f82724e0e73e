//! Error types for the swatch picker core.
//!
//! Most of the core never surfaces these to the user: the lenient color
//! conversions fall back to black, and storage or capture failures are
//! logged and dropped. The strict parsers and the collaborator traits are
//! where a `PickerError` actually travels.

use thiserror::Error;

/// Errors produced by picker operations.
#[derive(Debug, Error)]
pub enum PickerError {
    /// A hex color string was not exactly six hex digits (after an optional `#`).
    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    /// A text field held something that is not a number for that field.
    #[error("invalid value for {name}: '{value}'")]
    InvalidComponent { name: String, value: String },

    /// A raster or control had zero (or non-finite) width or height.
    #[error("invalid dimensions: width and height must be positive")]
    InvalidDimensions,

    /// The key-value store behind the recent-colors list failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The screenshot capture for the eyedropper failed.
    #[error("capture error: {0}")]
    Capture(String),

    /// A stored payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PickerError {
    fn from(e: serde_json::Error) -> Self {
        PickerError::Serialization(e.to_string())
    }
}
