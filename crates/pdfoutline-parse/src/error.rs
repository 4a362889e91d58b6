//! Error types for the document-access layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides
//! [`BackendError`] for backend-specific failures and conversion into the
//! core [`PatchError`] for unified handling downstream.

use pdfoutline_core::PatchError;
use thiserror::Error;

/// Error type for document-backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading document data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error extracting page text.
    #[error("text extraction error: {0}")]
    Text(String),
}

impl From<BackendError> for PatchError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PatchError::Backend(msg),
            BackendError::Io(e) => PatchError::Io(e.to_string()),
            BackendError::Text(msg) => PatchError::Backend(msg),
        }
    }
}
