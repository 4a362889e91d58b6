//! pdfoutline-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (outline tree, document info,
//! patch plan) and algorithms (PDF text-string codec, chapter-line parsing,
//! object-id assignment) used by pdfoutline-rs. It knows nothing about how
//! documents are opened or where their text comes from.

pub mod chapter;
pub mod encoding;
pub mod error;
pub mod index;
pub mod outline;

pub use chapter::{
    CHAPTER_KEYWORDS, ChapterLine, ChapterLineError, find_codepoints, parse_chapter_line,
    parse_chapter_line_str,
};
pub use encoding::{
    codepoints_to_utf8, decode_text_string, encode_text_string, str_to_codepoints,
    utf8_to_codepoints,
};
pub use error::{PatchError, ScanOutcome, ScanWarning, ScanWarningKind};
pub use index::{InfoMode, PatchPlan, assign_object_ids};
pub use outline::{DocumentInfo, OutlineNode, total_node_count};
