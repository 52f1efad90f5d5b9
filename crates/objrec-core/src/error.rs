//! Error types for objrec-core
//!
//! Provides a unified error type for image container and drawing
//! operations. Each variant captures enough context for diagnostics.

use thiserror::Error;

/// objrec-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {rows}x{cols}")]
    InvalidDimension { rows: u32, cols: u32 },

    /// Pixel coordinates outside the image
    #[error("pixel ({row}, {col}) out of bounds for {rows}x{cols} image")]
    OutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },

    /// Pixel value above the declared gray-level range
    #[error("pixel value {value} exceeds maximum gray level {max_gray}")]
    ValueOutOfRange { value: u32, max_gray: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
