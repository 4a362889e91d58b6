//! Explicit content-description and info-file loading.
//!
//! The optional third CLI argument supplies what the heuristics would
//! otherwise have to guess: either a JSON info file carrying title/author,
//! or a plain-text content description with one chapter line per line. In a
//! content description a line with leading whitespace becomes a child of the
//! most recent top-level entry, and optional `title:`/`author:` header lines
//! before the first chapter set the document info.

use std::path::Path;

use serde::Deserialize;

use pdfoutline_core::{
    DocumentInfo, OutlineNode, PatchError, ScanOutcome, ScanWarning, ScanWarningKind,
    parse_chapter_line_str,
};

/// Outline nodes plus document info loaded from an explicit description.
#[derive(Debug, Clone, Default)]
pub struct ContentSpec {
    /// Title/author for the Info dictionary.
    pub info: DocumentInfo,
    /// Pre-built outline entries; empty for a pure info file.
    pub nodes: Vec<OutlineNode>,
}

/// JSON shape of an info file: `{"title": ..., "author": ...}`.
#[derive(Debug, Deserialize)]
struct InfoFile {
    title: Option<String>,
    author: Option<String>,
}

/// Load a content-or-info file.
///
/// Files with a `.json` extension (or whose first non-blank byte is `{`) are
/// parsed as an info file; anything else as a plain-text content
/// description.
///
/// # Errors
///
/// Fails when the file cannot be read or the JSON form is malformed.
/// Unparseable chapter lines in the text form are collected as warnings,
/// not errors.
pub fn load_content_file(path: &Path) -> Result<ScanOutcome<ContentSpec>, PatchError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PatchError::SourceOpen(format!("{}: {e}", path.display())))?;

    let looks_like_json = path.extension().is_some_and(|ext| ext == "json")
        || text.trim_start().starts_with('{');
    if looks_like_json {
        let parsed: InfoFile = serde_json::from_str(&text)
            .map_err(|e| PatchError::Other(format!("invalid info file {}: {e}", path.display())))?;
        return Ok(ScanOutcome::ok(ContentSpec {
            info: DocumentInfo {
                title: parsed.title,
                author: parsed.author,
            },
            nodes: Vec::new(),
        }));
    }

    Ok(parse_content_text(&text))
}

/// Strip a `key:` prefix, case-insensitively, returning the trimmed value.
fn header_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    // split_at_checked: the line may open with a multi-byte character.
    let (head, rest) = trimmed.split_at_checked(key.len())?;
    if head.eq_ignore_ascii_case(key) && rest.starts_with(':') {
        Some(rest[1..].trim())
    } else {
        None
    }
}

/// Parse a plain-text content description.
///
/// Each non-blank line is a chapter line (`<title> <page>`, same shape the
/// heuristic extractor parses). Leading whitespace marks a child of the most
/// recently emitted top-level entry; a child with no preceding top-level
/// entry is promoted to top level.
pub fn parse_content_text(text: &str) -> ScanOutcome<ContentSpec> {
    let mut spec = ContentSpec::default();
    let mut warnings = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        if spec.nodes.is_empty() {
            if let Some(value) = header_value(raw, "title") {
                if !value.is_empty() {
                    spec.info.title = Some(value.to_string());
                }
                continue;
            }
            if let Some(value) = header_value(raw, "author") {
                if !value.is_empty() {
                    spec.info.author = Some(value.to_string());
                }
                continue;
            }
        }

        let is_child = raw.starts_with(' ') || raw.starts_with('\t');
        match parse_chapter_line_str(raw.trim_start()) {
            Ok(chapter) => {
                let node = OutlineNode::new(chapter.title, chapter.page);
                match spec.nodes.last_mut() {
                    Some(parent) if is_child => parent.children.push(node),
                    _ => spec.nodes.push(node),
                }
            }
            Err(e) => warnings.push(ScanWarning::new(
                ScanWarningKind::ChapterLineParse,
                format!("line {}: {e}", lineno + 1),
            )),
        }
    }

    ScanOutcome::with_warnings(spec, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // --- parse_content_text tests ---

    #[test]
    fn flat_content_description() {
        let outcome = parse_content_text("Chapter 1 5\nChapter 2 12\n");
        let spec = outcome.value;
        assert!(outcome.warnings.is_empty());
        assert_eq!(spec.nodes.len(), 2);
        assert_eq!(spec.nodes[0].title, "Chapter 1");
        assert_eq!(spec.nodes[0].dest_page, 5);
        assert!(spec.info.is_empty());
    }

    #[test]
    fn indented_lines_become_children() {
        let text = "Part One 1\n  Section A 2\n  Section B 4\nPart Two 9\n";
        let spec = parse_content_text(text).value;
        assert_eq!(spec.nodes.len(), 2);
        assert_eq!(spec.nodes[0].children.len(), 2);
        assert_eq!(spec.nodes[0].children[1].title, "Section B");
        assert_eq!(spec.nodes[0].children[1].dest_page, 4);
        assert!(spec.nodes[1].children.is_empty());
    }

    #[test]
    fn orphan_child_is_promoted_to_top_level() {
        let spec = parse_content_text("  Indented first 3\n").value;
        assert_eq!(spec.nodes.len(), 1);
        assert_eq!(spec.nodes[0].title, "Indented first");
    }

    #[test]
    fn header_lines_set_info() {
        let text = "title: My Book\nauthor: Someone\nChapter 1 3\n";
        let spec = parse_content_text(text).value;
        assert_eq!(spec.info.title.as_deref(), Some("My Book"));
        assert_eq!(spec.info.author.as_deref(), Some("Someone"));
        assert_eq!(spec.nodes.len(), 1);
    }

    #[test]
    fn headers_after_first_chapter_are_chapter_lines() {
        // "title:" past the first entry is no longer special; without a
        // trailing page number it is skipped with a warning.
        let text = "Chapter 1 3\ntitle: Late Header\n";
        let outcome = parse_content_text(text);
        assert_eq!(outcome.value.nodes.len(), 1);
        assert!(outcome.value.info.title.is_none());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn bad_lines_collect_warnings() {
        let outcome = parse_content_text("Chapter 1 3\nno page number here\nChapter 2 9\n");
        assert_eq!(outcome.value.nodes.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, ScanWarningKind::ChapterLineParse);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let spec = parse_content_text("\n\nChapter 1 3\n\n").value;
        assert_eq!(spec.nodes.len(), 1);
    }

    #[test]
    fn cjk_chapter_lines() {
        let spec = parse_content_text("第一章　连环奸杀案／3\n第二章　设下诡局／18\n").value;
        assert_eq!(spec.nodes.len(), 2);
        assert_eq!(spec.nodes[0].title, "第一章　连环奸杀案");
        assert_eq!(spec.nodes[0].dest_page, 3);
    }

    // --- load_content_file tests ---

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_json_info_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "info.json", r#"{"title": "T", "author": "A"}"#);
        let outcome = load_content_file(&path).unwrap();
        assert_eq!(outcome.value.info.title.as_deref(), Some("T"));
        assert_eq!(outcome.value.info.author.as_deref(), Some("A"));
        assert!(outcome.value.nodes.is_empty());
    }

    #[test]
    fn load_json_with_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "info.json", r#"{"title": "Only"}"#);
        let outcome = load_content_file(&path).unwrap();
        assert_eq!(outcome.value.info.title.as_deref(), Some("Only"));
        assert!(outcome.value.info.author.is_none());
    }

    #[test]
    fn load_malformed_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "info.json", "{not json");
        assert!(load_content_file(&path).is_err());
    }

    #[test]
    fn load_text_content_description() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "contents.txt", "Chapter 1 5\n  Detail 6\n");
        let outcome = load_content_file(&path).unwrap();
        assert_eq!(outcome.value.nodes.len(), 1);
        assert_eq!(outcome.value.nodes[0].children.len(), 1);
    }

    #[test]
    fn load_missing_file_is_source_open_failure() {
        let err = load_content_file(Path::new("/nonexistent/contents.txt")).unwrap_err();
        assert!(matches!(err, PatchError::SourceOpen(_)));
    }

    #[test]
    fn braced_text_without_json_extension_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "meta", r#"{"author": "A"}"#);
        let outcome = load_content_file(&path).unwrap();
        assert_eq!(outcome.value.info.author.as_deref(), Some("A"));
    }
}
