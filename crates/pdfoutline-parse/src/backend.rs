//! Document backend trait.
//!
//! Defines the [`DocBackend`] trait that abstracts every document-processing
//! operation the outline heuristics consume. This keeps the extractor and
//! calibrator testable against a mock and leaves real parsing to a pluggable
//! backend (lopdf by default).

use pdfoutline_core::{OutlineNode, PatchError};

/// Trait abstracting document access operations.
///
/// A backend provides page counts, per-page Unicode text, per-page full-text
/// hit counting, and the existing-outline/Info lookups that decide whether
/// anything needs reconstructing at all.
///
/// # Associated Types
///
/// - `Document`: the parsed document representation.
/// - `Error`: backend-specific error type, convertible to [`PatchError`].
pub trait DocBackend {
    /// The parsed document type.
    type Document;

    /// Backend-specific error type, convertible to [`PatchError`].
    type Error: std::error::Error + Into<PatchError>;

    /// Parse document bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not form a loadable PDF document.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// The page's Unicode text as a flat code-point sequence, in reading
    /// order, with a synthetic newline between text lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or text extraction
    /// fails outright. A page with no text yields an empty sequence, not an
    /// error.
    fn page_codepoints(doc: &Self::Document, index: usize) -> Result<Vec<u32>, Self::Error>;

    /// Count full-text occurrences of `needle` on the page.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or extraction fails.
    fn count_hits(doc: &Self::Document, index: usize, needle: &str)
    -> Result<usize, Self::Error>;

    /// Load the document's existing outline tree.
    ///
    /// Returns `None` when the document has no outline — the signal that the
    /// heuristic reconstruction should run.
    ///
    /// # Errors
    ///
    /// Returns an error only for structural failures; a merely absent or
    /// empty outline is `None`.
    fn existing_outline(doc: &Self::Document) -> Result<Option<Vec<OutlineNode>>, Self::Error>;

    /// Object id of the trailer's `/Info` dictionary, if one is referenced.
    fn info_object_id(doc: &Self::Document) -> Result<Option<u32>, Self::Error>;

    /// One past the highest object id present in the document.
    ///
    /// New objects appended by the patcher take ids starting here.
    fn object_count(doc: &Self::Document) -> u32;
}
