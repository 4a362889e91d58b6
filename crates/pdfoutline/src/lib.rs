//! pdfoutline: Reconstruct PDF outlines and metadata and patch them into the
//! file byte stream.
//!
//! This is the public API facade crate for pdfoutline-rs. It hosts the
//! table-of-contents heuristics and the byte-stream patcher, and re-exports
//! the underlying crates.
//!
//! # Architecture
//!
//! - **pdfoutline-core**: backend-independent types and algorithms (outline
//!   tree, PDF text-string codec, chapter-line parsing, object numbering)
//! - **pdfoutline-parse**: document access behind the `DocBackend` trait
//!   (lopdf by default)
//! - **pdfoutline** (this crate): extractor, page-offset calibrator,
//!   byte-stream patcher, content-file loader, and the end-to-end pipeline

pub use pdfoutline_core;
pub use pdfoutline_parse;

pub mod calibrate;
pub mod content_file;
pub mod extractor;
pub mod fix;
pub mod patcher;

#[cfg(test)]
pub(crate) mod testutil;

pub use calibrate::calibrate_page_offset;
pub use content_file::{ContentSpec, load_content_file, parse_content_text};
pub use extractor::{Extraction, HIT_THRESHOLD, SEARCH_MAX_PAGE, extract_outline};
pub use fix::{FixOptions, FixReport, fix_document};
pub use patcher::patch;

pub use pdfoutline_core::{DocumentInfo, OutlineNode, PatchError, PatchPlan};
pub use pdfoutline_parse::{DocBackend, LopdfBackend};
