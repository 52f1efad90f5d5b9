//! Error types for objrec-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] objrec_core::Error),

    /// Descriptor file could not be read or written
    #[error("descriptor I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor data that cannot be decoded at all
    #[error("invalid descriptor data: {0}")]
    InvalidData(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Too many provisional labels for the label type
    #[error("label overflow: {0} provisional labels plus offset {1} exceed u32")]
    LabelOverflow(u64, u32),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
