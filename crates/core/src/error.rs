//! Error types for deck generation and read-back.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, writing, or reading a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to create, write, or read a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The deck model cannot be serialized as given.
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    /// Failed to parse the PPTX package structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML reading or writing error.
    #[error("XML error: {0}")]
    XmlError(String),
}
