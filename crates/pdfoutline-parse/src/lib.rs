//! pdfoutline-parse: Document access for pdfoutline-rs.
//!
//! Defines the [`DocBackend`] trait — the seam to the document-processing
//! library that supplies page text, full-text search, page counts, and the
//! existing-outline/Info lookups — and the default [`LopdfBackend`]
//! implementation over [lopdf](https://crates.io/crates/lopdf).

pub mod backend;
pub mod error;
pub mod lopdf_backend;

pub use backend::DocBackend;
pub use error::BackendError;
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
