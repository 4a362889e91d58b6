//! Table-of-contents heuristic extraction.
//!
//! Finds the document's own printed contents page(s), pulls their text out,
//! and turns the chapter lines into a flat outline. The heuristic is keyword
//! driven: a page counts as part of the contents block once a chapter
//! keyword occurs on it more often than a fixed threshold, so a lone inline
//! mention of "Chapter" never triggers extraction.

use pdfoutline_core::{
    CHAPTER_KEYWORDS, OutlineNode, ScanOutcome, ScanWarning, ScanWarningKind, codepoints_to_utf8,
    find_codepoints, parse_chapter_line, str_to_codepoints,
};
use pdfoutline_parse::DocBackend;

/// How many pages from the front of the document are scanned for a contents
/// page. The calibrator searches up to twice this far for the first chapter
/// body.
pub const SEARCH_MAX_PAGE: usize = 20;

/// A page qualifies as a contents page once a keyword's hit count exceeds
/// this.
pub const HIT_THRESHOLD: usize = 4;

/// Result of a heuristic extraction run.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// The extracted top-level outline nodes (the extractor never nests).
    pub nodes: Vec<OutlineNode>,
    /// First page of the contents block (0-indexed).
    pub content_start_page: usize,
    /// Number of consecutive contents pages.
    pub content_page_count: usize,
}

/// Locate the first run of consecutive pages where some chapter keyword's
/// hit count exceeds [`HIT_THRESHOLD`].
fn locate_content_block<B: DocBackend>(
    doc: &B::Document,
) -> Result<Option<(usize, usize)>, B::Error> {
    let limit = B::page_count(doc).min(SEARCH_MAX_PAGE);
    let mut block: Option<(usize, usize)> = None;

    for page in 0..limit {
        let mut qualifies = false;
        for keyword in CHAPTER_KEYWORDS {
            let hits = B::count_hits(doc, page, keyword)?;
            if hits > HIT_THRESHOLD {
                tracing::debug!(page, keyword = %keyword, hits, "contents page candidate");
                qualifies = true;
                break;
            }
        }
        match (block, qualifies) {
            (None, true) => block = Some((page, 1)),
            (Some((start, count)), true) => block = Some((start, count + 1)),
            // The first run of qualifying pages is the content block; a
            // second run later in the front matter is not considered.
            (Some(_), false) => return Ok(block),
            (None, false) => {}
        }
    }

    Ok(block)
}

/// Split the content buffer into raw chapter lines at keyword hits.
///
/// Keywords are tried in order; the first one that produces hits wins. Each
/// line spans from a hit's start to the next hit's start, and the final hit
/// extends to the end of the buffer.
fn segment_chapter_lines(buffer: &[u32]) -> Vec<&[u32]> {
    for keyword in CHAPTER_KEYWORDS {
        let needle = str_to_codepoints(keyword);
        let mut positions = Vec::new();
        let mut from = 0;
        while let Some(pos) = find_codepoints(buffer, &needle, from) {
            positions.push(pos);
            from = pos + 1;
        }
        if positions.is_empty() {
            continue;
        }
        let mut lines = Vec::with_capacity(positions.len());
        for (i, &pos) in positions.iter().enumerate() {
            let end = positions.get(i + 1).copied().unwrap_or(buffer.len());
            lines.push(&buffer[pos..end]);
        }
        return lines;
    }
    Vec::new()
}

/// Run the heuristic extraction over a document.
///
/// Never fails for content reasons: a document without a recognizable
/// contents page yields an empty outline plus a warning, and unparseable
/// chapter lines are skipped individually. Backend errors (page access,
/// text extraction) propagate.
pub fn extract_outline<B: DocBackend>(
    doc: &B::Document,
) -> Result<ScanOutcome<Extraction>, B::Error> {
    let Some((start, count)) = locate_content_block::<B>(doc)? else {
        return Ok(ScanOutcome::with_warnings(
            Extraction::default(),
            vec![ScanWarning::new(
                ScanWarningKind::NoContentsPage,
                "no page passed the chapter-keyword threshold",
            )],
        ));
    };
    tracing::debug!(start, count, "content block located");

    let mut buffer: Vec<u32> = Vec::new();
    for page in start..start + count {
        let mut points = B::page_codepoints(doc, page)?;
        buffer.append(&mut points);
        // Page boundaries behave like line breaks for segmentation.
        buffer.push('\n' as u32);
    }

    let extraction = Extraction {
        nodes: Vec::new(),
        content_start_page: start,
        content_page_count: count,
    };

    if buffer.iter().all(|&cp| cp == '\n' as u32) {
        return Ok(ScanOutcome::with_warnings(
            extraction,
            vec![ScanWarning::on_page(
                ScanWarningKind::NoTextExtracted,
                "content block yielded no text",
                start,
            )],
        ));
    }

    let mut nodes = Vec::new();
    let mut warnings = Vec::new();
    for line in segment_chapter_lines(&buffer) {
        match parse_chapter_line(line) {
            Ok(chapter) => nodes.push(OutlineNode::new(chapter.title, chapter.page)),
            Err(e) => {
                let snippet: String = codepoints_to_utf8(&line[..line.len().min(32)]);
                warnings.push(ScanWarning::on_page(
                    ScanWarningKind::ChapterLineParse,
                    format!("{e}: {snippet:?}"),
                    start,
                ));
            }
        }
    }
    tracing::debug!(chapters = nodes.len(), skipped = warnings.len(), "chapter lines parsed");

    Ok(ScanOutcome::with_warnings(
        Extraction { nodes, ..extraction },
        warnings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{TextBackend, TextDocument};

    fn toc_page() -> String {
        [
            "Contents",
            "Chapter 1 .......... 1",
            "Chapter 2 .......... 5",
            "Chapter 3 .......... 9",
            "Chapter 4 .......... 13",
            "Chapter 5 .......... 17",
        ]
        .join("\n")
    }

    #[test]
    fn extracts_flat_outline_from_toc_page() {
        let doc = TextDocument::new(&["cover page", &toc_page(), "Chapter 1 body"]);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        assert!(outcome.is_clean());
        let extraction = outcome.value;
        assert_eq!(extraction.content_start_page, 1);
        assert_eq!(extraction.content_page_count, 1);
        assert_eq!(extraction.nodes.len(), 5);
        assert_eq!(extraction.nodes[0].title, "Chapter 1");
        assert_eq!(extraction.nodes[0].dest_page, 1);
        assert_eq!(extraction.nodes[4].title, "Chapter 5");
        assert_eq!(extraction.nodes[4].dest_page, 17);
    }

    #[test]
    fn threshold_requires_more_than_four_hits() {
        // Exactly four mentions: below the qualifying threshold.
        let four = "Chapter 1, Chapter 2, Chapter 3, Chapter 4";
        let doc = TextDocument::new(&[four]);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        assert!(outcome.value.nodes.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, ScanWarningKind::NoContentsPage);
    }

    #[test]
    fn content_block_spans_consecutive_pages() {
        let page2 = [
            "Chapter 6 .......... 21",
            "Chapter 7 .......... 25",
            "Chapter 8 .......... 29",
            "Chapter 9 .......... 33",
            "Chapter 10 .......... 37",
        ]
        .join("\n");
        let doc = TextDocument::new(&["cover", &toc_page(), &page2, "body"]);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        let extraction = outcome.value;
        assert_eq!(extraction.content_start_page, 1);
        assert_eq!(extraction.content_page_count, 2);
        assert_eq!(extraction.nodes.len(), 10);
        assert_eq!(extraction.nodes[9].title, "Chapter 10");
        assert_eq!(extraction.nodes[9].dest_page, 37);
    }

    #[test]
    fn only_first_run_of_qualifying_pages_is_used() {
        let doc = TextDocument::new(&[&toc_page(), "plain text", &toc_page()]);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        let extraction = outcome.value;
        assert_eq!(extraction.content_start_page, 0);
        assert_eq!(extraction.content_page_count, 1);
        assert_eq!(extraction.nodes.len(), 5);
    }

    #[test]
    fn unparseable_lines_are_skipped_with_warnings() {
        let page = [
            "Chapter 1 .......... 1",
            "Chapter intermission without a number",
            "Chapter 3 .......... 9",
            "Chapter 4 .......... 13",
            "Chapter 5 .......... 17",
        ]
        .join("\n");
        let doc = TextDocument::new(&[&page]);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        assert_eq!(outcome.value.nodes.len(), 4);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, ScanWarningKind::ChapterLineParse);
    }

    #[test]
    fn cjk_keyword_extraction() {
        let page = [
            "目录",
            "第一章　连环奸杀案／3",
            "第二章　设下诡局／18",
            "第三章　痕迹／33",
            "第四章　对决／48",
            "第五章　真相／63",
        ]
        .join("\n");
        let doc = TextDocument::new(&[&page]);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        let nodes = &outcome.value.nodes;
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].title, "第一章　连环奸杀案");
        assert_eq!(nodes[0].dest_page, 3);
        assert_eq!(nodes[4].title, "第五章　真相");
        assert_eq!(nodes[4].dest_page, 63);
    }

    #[test]
    fn no_contents_page_in_document() {
        let doc = TextDocument::new(&["just prose", "more prose"]);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        assert!(outcome.value.nodes.is_empty());
        assert_eq!(outcome.warnings[0].kind, ScanWarningKind::NoContentsPage);
    }

    #[test]
    fn scan_stops_at_page_limit() {
        // TOC beyond SEARCH_MAX_PAGE is never considered.
        let mut pages: Vec<String> = (0..SEARCH_MAX_PAGE).map(|i| format!("page {i}")).collect();
        pages.push(toc_page());
        let refs: Vec<&str> = pages.iter().map(|s| s.as_str()).collect();
        let doc = TextDocument::new(&refs);
        let outcome = extract_outline::<TextBackend>(&doc).unwrap();
        assert!(outcome.value.nodes.is_empty());
    }
}
