//! Page-offset calibration.
//!
//! Printed page numbers on a contents page usually drift from the actual
//! page positions by a constant amount (cover, front matter, the contents
//! pages themselves). The calibrator measures that drift once, by searching
//! for the first chapter's title in the document body, and applies the same
//! delta to every entry. Documents whose numbering shifts again mid-stream
//! will calibrate incorrectly; the correction is deliberately uniform.

use pdfoutline_parse::DocBackend;

use crate::extractor::{Extraction, SEARCH_MAX_PAGE};

/// Measure and apply the page-number drift for an extraction.
///
/// Searches for the first extracted title starting on the page after the
/// content block, up to `min(2 * SEARCH_MAX_PAGE, page_count)`. On the first
/// hit the offset `hit_page - stated_page` is added to every node's
/// destination (children included). Returns the applied offset, `0` when the
/// title is never found again or the extraction is empty.
pub fn calibrate_page_offset<B: DocBackend>(
    doc: &B::Document,
    extraction: &mut Extraction,
) -> Result<i64, B::Error> {
    let Some(first) = extraction.nodes.first() else {
        return Ok(0);
    };
    if first.title.is_empty() {
        return Ok(0);
    }
    let title = first.title.clone();
    let stated_page = first.dest_page;

    let start = extraction.content_start_page + extraction.content_page_count;
    let end = (2 * SEARCH_MAX_PAGE).min(B::page_count(doc));

    for page in start..end {
        if B::count_hits(doc, page, &title)? > 0 {
            let offset = page as i64 - stated_page;
            if offset != 0 {
                tracing::debug!(offset, page, title = %title, "page offset calibrated");
                for node in &mut extraction.nodes {
                    node.dest_page += offset;
                    for child in &mut node.children {
                        child.dest_page += offset;
                    }
                }
            }
            return Ok(offset);
        }
    }

    tracing::debug!(title = %title, "first chapter title not found again; no offset applied");
    Ok(0)
}
