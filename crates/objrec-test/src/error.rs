//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to write an image
    #[error("failed to write image '{path}': {message}")]
    ImageWrite { path: String, message: String },

    /// ASCII fixture could not be turned into an image
    #[error("bad ASCII fixture at row {row}: {message}")]
    Fixture { row: usize, message: String },

    /// Image construction failed
    #[error("image error: {0}")]
    Core(#[from] objrec_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
