//! In-memory document backend for unit tests: each page is a plain string.

use pdfoutline_core::{OutlineNode, PatchError};
use pdfoutline_parse::DocBackend;

pub(crate) struct TextBackend;

pub(crate) struct TextDocument {
    pub pages: Vec<String>,
}

impl TextDocument {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl DocBackend for TextBackend {
    type Document = TextDocument;
    type Error = PatchError;

    fn open(_bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        Ok(TextDocument { pages: Vec::new() })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.pages.len()
    }

    fn page_codepoints(doc: &Self::Document, index: usize) -> Result<Vec<u32>, Self::Error> {
        let page = doc
            .pages
            .get(index)
            .ok_or_else(|| PatchError::Other(format!("page {index} out of range")))?;
        Ok(page.chars().map(|c| c as u32).collect())
    }

    fn count_hits(doc: &Self::Document, index: usize, needle: &str) -> Result<usize, Self::Error> {
        let page = doc
            .pages
            .get(index)
            .ok_or_else(|| PatchError::Other(format!("page {index} out of range")))?;
        Ok(page.matches(needle).count())
    }

    fn existing_outline(_doc: &Self::Document) -> Result<Option<Vec<OutlineNode>>, Self::Error> {
        Ok(None)
    }

    fn info_object_id(_doc: &Self::Document) -> Result<Option<u32>, Self::Error> {
        Ok(None)
    }

    fn object_count(_doc: &Self::Document) -> u32 {
        1
    }
}
