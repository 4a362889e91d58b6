//! Chapter-line recognition.
//!
//! A printed contents page is a run of lines shaped like
//! `Chapter 1 .......... 5` or `第一章　连环奸杀案／3`. This module holds the
//! keyword table used to find and segment those lines, the code-point
//! subsequence search, and the parser that splits one raw line into a title
//! and a destination page number.

use regex::Regex;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::encoding::codepoints_to_utf8;

/// Ordered multilingual keyword list marking chapter lines.
///
/// Order matters: the first keyword that produces hits on the contents page
/// wins and the rest are not tried. Keywords must be valid UTF-8.
pub const CHAPTER_KEYWORDS: &[&str] = &["Chapter", "chapter", "第"];

/// A parsed chapter line: title plus the printed destination page number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChapterLine {
    /// The chapter title, NFC-normalized, trailing separators stripped.
    pub title: String,
    /// The printed page number (decimal; no offset correction applied).
    pub page: i64,
}

/// Failure to split a raw chapter line into title and page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterLineError {
    /// The line has no trailing digit run to use as a page number.
    NoPageNumber,
    /// The trailing digit run does not fit a page number.
    PageOutOfRange,
}

impl fmt::Display for ChapterLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChapterLineError::NoPageNumber => write!(f, "no page number found"),
            ChapterLineError::PageOutOfRange => write!(f, "page number out of range"),
        }
    }
}

impl std::error::Error for ChapterLineError {}

/// Find the first occurrence of `needle` in `haystack` at or after `from`.
///
/// Plain code-point subsequence search; returns the match's start index.
pub fn find_codepoints(haystack: &[u32], needle: &[u32], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|idx| from + idx)
}

/// Characters stripped from the end of a title once the page number is gone:
/// plain and ideographic space, slash, backslash, fullwidth slash.
fn is_title_separator(c: char) -> bool {
    matches!(c, ' ' | '\u{3000}' | '/' | '\\' | '／')
}

/// Parse one raw chapter line into `(title, page)`.
///
/// The algorithm, in order:
/// 1. strip every `.` (dot-leaders),
/// 2. take the rightmost run of ASCII digits as the page number, ignoring
///    any non-digit tail after it,
/// 3. strip trailing separator glyphs from what precedes the digits; that
///    is the title, NFC-normalized.
///
/// A line with no digit run is rejected; the caller skips it and continues
/// with the next keyword hit.
pub fn parse_chapter_line(line: &[u32]) -> Result<ChapterLine, ChapterLineError> {
    let text: String = codepoints_to_utf8(line).replace('.', "");

    let re = match Regex::new(r"(?s)^(.*?)([0-9]+)[^0-9]*$") {
        Ok(re) => re,
        Err(_) => return Err(ChapterLineError::NoPageNumber),
    };
    let captures = re.captures(&text).ok_or(ChapterLineError::NoPageNumber)?;

    let page: i64 = captures[2]
        .parse()
        .map_err(|_| ChapterLineError::PageOutOfRange)?;

    let title: String = captures[1]
        .trim_end_matches(is_title_separator)
        .nfc()
        .collect();

    Ok(ChapterLine { title, page })
}

/// Convenience wrapper over [`parse_chapter_line`] for `&str` input.
pub fn parse_chapter_line_str(line: &str) -> Result<ChapterLine, ChapterLineError> {
    let points: Vec<u32> = line.chars().map(|c| c as u32).collect();
    parse_chapter_line(&points)
}
