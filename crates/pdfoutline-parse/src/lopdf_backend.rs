//! lopdf-based document backend.
//!
//! Implements [`DocBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. This is the default backend for pdfoutline-rs.

use std::collections::HashSet;

use pdfoutline_core::OutlineNode;

use crate::backend::DocBackend;
use crate::error::BackendError;

/// Nesting depth past which an outline chain is abandoned. Reconstruction
/// only ever emits one level, so anything deeper exists purely to report
/// "an outline is present".
const MAX_OUTLINE_DEPTH: usize = 8;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based document backend.
pub struct LopdfBackend;

/// Follow reference chains until a direct object is reached.
fn resolve<'a>(
    doc: &'a lopdf::Document,
    mut obj: &'a lopdf::Object,
) -> Result<&'a lopdf::Object, BackendError> {
    let mut hops = 0;
    while let lopdf::Object::Reference(id) = obj {
        if hops > 16 {
            return Err(BackendError::Parse("reference chain too deep".to_string()));
        }
        obj = doc
            .get_object(*id)
            .map_err(|e| BackendError::Parse(format!("unresolvable reference {id:?}: {e}")))?;
        hops += 1;
    }
    Ok(obj)
}

/// Decode an outline title's string bytes.
///
/// UTF-16BE with a byte-order mark per the PDF text-string convention;
/// anything else is treated as a single-byte string.
fn decode_title(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let (text, _, _) = encoding_rs::UTF_16BE.decode(&bytes[2..]);
        text.into_owned()
    } else {
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
        text.into_owned()
    }
}

/// Resolve a `/Dest` value to a 0-based page index.
///
/// Handles the direct-array form and the dictionary form with a `/D` entry.
/// Unresolvable destinations fall back to page 0: an existing outline is
/// only inspected to decide whether reconstruction is needed at all.
fn dest_page_index(
    doc: &lopdf::Document,
    page_ids: &[lopdf::ObjectId],
    obj: &lopdf::Object,
) -> i64 {
    let Ok(resolved) = resolve(doc, obj) else {
        return 0;
    };
    let array = match resolved {
        lopdf::Object::Array(a) => a,
        lopdf::Object::Dictionary(d) => {
            let Ok(inner) = d.get(b"D") else { return 0 };
            match resolve(doc, inner) {
                Ok(lopdf::Object::Array(a)) => a,
                _ => return 0,
            }
        }
        _ => return 0,
    };
    match array.first() {
        Some(lopdf::Object::Reference(id)) => page_ids
            .iter()
            .position(|p| p == id)
            .map(|i| i as i64)
            .unwrap_or(0),
        Some(lopdf::Object::Integer(i)) => *i,
        _ => 0,
    }
}

/// Walk a `/First`/`/Next` sibling chain into outline nodes.
///
/// `visited` guards against reference cycles in malformed files; a repeated
/// id terminates the chain.
fn walk_outline(
    doc: &lopdf::Document,
    page_ids: &[lopdf::ObjectId],
    first_id: lopdf::ObjectId,
    visited: &mut HashSet<lopdf::ObjectId>,
    depth: usize,
) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut current = Some(first_id);

    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        let Ok(obj) = doc.get_object(id) else { break };
        let Ok(dict) = obj.as_dict() else { break };

        let title = match dict.get(b"Title").ok().and_then(|t| resolve(doc, t).ok()) {
            Some(lopdf::Object::String(bytes, _)) => decode_title(bytes),
            _ => String::new(),
        };
        let dest_page = dict
            .get(b"Dest")
            .map(|d| dest_page_index(doc, page_ids, d))
            .unwrap_or(0);

        let children = match dict.get(b"First").ok().and_then(|f| f.as_reference().ok()) {
            Some(child_id) if depth < MAX_OUTLINE_DEPTH => {
                walk_outline(doc, page_ids, child_id, visited, depth + 1)
            }
            _ => Vec::new(),
        };

        nodes.push(OutlineNode {
            title,
            dest_page,
            children,
            object_id: None,
        });

        current = dict.get(b"Next").ok().and_then(|n| n.as_reference().ok());
    }

    nodes
}

impl DocBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to load document: {e}")))?;
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().into_values().collect();
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn page_codepoints(doc: &Self::Document, index: usize) -> Result<Vec<u32>, Self::Error> {
        if index >= doc.page_ids.len() {
            return Err(BackendError::Text(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            )));
        }
        let text = doc
            .inner
            .extract_text(&[index as u32 + 1])
            .map_err(|e| BackendError::Text(format!("page {index}: {e}")))?;
        Ok(text.chars().map(|c| c as u32).collect())
    }

    fn count_hits(
        doc: &Self::Document,
        index: usize,
        needle: &str,
    ) -> Result<usize, Self::Error> {
        if needle.is_empty() {
            return Ok(0);
        }
        if index >= doc.page_ids.len() {
            return Err(BackendError::Text(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            )));
        }
        let text = doc
            .inner
            .extract_text(&[index as u32 + 1])
            .map_err(|e| BackendError::Text(format!("page {index}: {e}")))?;
        Ok(text.matches(needle).count())
    }

    fn existing_outline(doc: &Self::Document) -> Result<Option<Vec<OutlineNode>>, Self::Error> {
        // Absence at any link of the chain means "no outline": the caller
        // falls back to heuristic reconstruction, never to an error.
        let Ok(root) = doc.inner.trailer.get(b"Root") else {
            return Ok(None);
        };
        let Ok(catalog) = resolve(&doc.inner, root).and_then(|o| {
            o.as_dict()
                .map_err(|e| BackendError::Parse(format!("catalog is not a dictionary: {e}")))
        }) else {
            return Ok(None);
        };
        let Some(outlines) = catalog
            .get(b"Outlines")
            .ok()
            .and_then(|o| resolve(&doc.inner, o).ok())
            .and_then(|o| o.as_dict().ok())
        else {
            return Ok(None);
        };
        let Some(first_id) = outlines.get(b"First").ok().and_then(|f| f.as_reference().ok())
        else {
            return Ok(None);
        };

        let mut visited = HashSet::new();
        let nodes = walk_outline(&doc.inner, &doc.page_ids, first_id, &mut visited, 0);
        if nodes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(nodes))
        }
    }

    fn info_object_id(doc: &Self::Document) -> Result<Option<u32>, Self::Error> {
        Ok(doc
            .inner
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|o| o.as_reference().ok())
            .map(|id| id.0))
    }

    fn object_count(doc: &Self::Document) -> u32 {
        doc.inner.max_id + 1
    }
}
