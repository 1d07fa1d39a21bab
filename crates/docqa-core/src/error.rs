//! Error types for docqa

use thiserror::Error;

/// Result type alias using DocQaError
pub type Result<T> = std::result::Result<T, DocQaError>;

/// Error type alias for convenience
pub type Error = DocQaError;

/// Main error type for docqa
#[derive(Debug, Error)]
pub enum DocQaError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Document conversion error: {0}")]
    Conversion(String),

    #[error("Text decoding error: {0}")]
    Decoding(String),

    #[error("PDF extraction error: {0}")]
    PdfExtract(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl DocQaError {
    /// Whether the error is attributable to the caller (bad input) rather
    /// than to processing or a downstream service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType(_) | Self::DocumentNotFound(_) | Self::Config(_)
        )
    }
}
