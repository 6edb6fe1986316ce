//! Error types for the tabrec-core library.

use thiserror::Error;

/// Main error type for the tabrec library.
#[derive(Error, Debug)]
pub enum TabrecError {
    /// Report extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to report extraction.
///
/// Row-level problems never surface here; a row missing required fields is
/// silently dropped and only counted. The single fatal condition is a
/// document with no OCR text at all.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document produced no OCR text.
    #[error("no OCR text to process")]
    NoText,
}

/// Result type for the tabrec library.
pub type Result<T> = std::result::Result<T, TabrecError>;
