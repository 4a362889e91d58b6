//! Error and warning types for pdfoutline-rs.
//!
//! Provides [`PatchError`] for fatal errors that abort a patch run,
//! [`ScanWarning`] for non-fatal issues the extractor recovers from, and
//! [`ScanOutcome`] for pairing a value with collected warnings.

use std::fmt;

/// Fatal error types for a patch run.
///
/// Any of these aborts the whole operation; a partially written destination
/// file carries no validity guarantee (the pipeline stages output through a
/// temporary path so the final destination is never left truncated).
#[derive(Debug, Clone, PartialEq)]
pub enum PatchError {
    /// The source PDF could not be opened or read.
    SourceOpen(String),
    /// The destination file could not be created or replaced.
    DestinationOpen(String),
    /// A trigger's lookahead ran past the end of the input.
    UnexpectedEndOfStream {
        /// Byte offset where the lookahead started.
        offset: usize,
        /// Bytes the lookahead required.
        wanted: usize,
        /// Bytes actually available.
        available: usize,
    },
    /// An error reported by the document-access backend.
    Backend(String),
    /// I/O failure while streaming bytes to the destination.
    Io(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::SourceOpen(msg) => write!(f, "cannot open source: {msg}"),
            PatchError::DestinationOpen(msg) => write!(f, "cannot open destination: {msg}"),
            PatchError::UnexpectedEndOfStream {
                offset,
                wanted,
                available,
            } => write!(
                f,
                "unexpected end of stream at offset {offset} (wanted {wanted} bytes, {available} available)"
            ),
            PatchError::Backend(msg) => write!(f, "document backend error: {msg}"),
            PatchError::Io(msg) => write!(f, "I/O error: {msg}"),
            PatchError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PatchError {}

impl From<std::io::Error> for PatchError {
    fn from(err: std::io::Error) -> Self {
        PatchError::Io(err.to_string())
    }
}

/// Machine-readable code for a non-fatal scanning issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ScanWarningKind {
    /// A chapter line had no trailing digit run to use as a page number.
    ChapterLineParse,
    /// No page qualified as a printed contents page.
    NoContentsPage,
    /// The located content block yielded no text.
    NoTextExtracted,
}

impl ScanWarningKind {
    /// Returns the string tag for this warning kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanWarningKind::ChapterLineParse => "CHAPTER_LINE_PARSE",
            ScanWarningKind::NoContentsPage => "NO_CONTENTS_PAGE",
            ScanWarningKind::NoTextExtracted => "NO_TEXT_EXTRACTED",
        }
    }
}

impl fmt::Display for ScanWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered while scanning for an outline.
///
/// Warnings allow best-effort continuation: an unparseable chapter line is
/// skipped, a missing contents page yields an empty outline instead of an
/// error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanWarning {
    /// Machine-readable warning kind.
    pub kind: ScanWarningKind,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (0-indexed), if applicable.
    pub page: Option<usize>,
}

impl ScanWarning {
    /// Create a warning with a kind and description.
    pub fn new(kind: ScanWarningKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            page: None,
        }
    }

    /// Create a warning with page context.
    pub fn on_page(kind: ScanWarningKind, description: impl Into<String>, page: usize) -> Self {
        Self {
            kind,
            description: description.into(),
            page: Some(page),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
#[derive(Debug, Clone)]
pub struct ScanOutcome<T> {
    /// The scanned value.
    pub value: T,
    /// Warnings collected while scanning.
    pub warnings: Vec<ScanWarning>,
}

impl<T> ScanOutcome<T> {
    /// Create an outcome with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create an outcome with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ScanWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScanOutcome<U> {
        ScanOutcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
