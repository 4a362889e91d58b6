//! Byte-stream PDF patching.
//!
//! One linear pass over the source bytes, copying everything verbatim except
//! at three trigger tokens:
//!
//! - `Catalog` — inject the `/Outlines` reference and `/PageMode`,
//! - `trailer` — inject the `/Info` reference after the trailer's `<<`,
//! - `endobj` — append the new outline/info objects, or patch missing keys
//!   into an existing Info object's body.
//!
//! The file's object graph and cross-reference table are never re-parsed or
//! rewritten; the appended objects rely on readers that rebuild or ignore a
//! stale xref. Each trigger is armed only while its work is pending, and a
//! lookahead that runs off the end of the buffer while work remains is a
//! fatal `UnexpectedEndOfStream`.

use std::io::Write;

use pdfoutline_core::outline::total_node_count;
use pdfoutline_core::{
    DocumentInfo, OutlineNode, PatchError, PatchPlan, encode_text_string, str_to_codepoints,
};

/// Bytes a trigger lookahead reads past its first letter. `Catalog` and
/// `trailer` compare all six; `endobj` compares five and the sixth rides
/// along with the copy.
const LOOKAHEAD: usize = 6;

/// Read `LOOKAHEAD` bytes starting at `offset`, or fail the pass.
fn lookahead(input: &[u8], offset: usize) -> Result<&[u8], PatchError> {
    if offset + LOOKAHEAD > input.len() {
        return Err(PatchError::UnexpectedEndOfStream {
            offset,
            wanted: LOOKAHEAD,
            available: input.len().saturating_sub(offset),
        });
    }
    Ok(&input[offset..offset + LOOKAHEAD])
}

/// Find `needle` in `haystack`, returning the match's start offset.
fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Write `text` as a PDF literal string: UTF-16BE bytes with a byte-order
/// mark between `(` and `)`. No delimiter escaping is performed; titles
/// containing `(`, `)` or `\` corrupt the emitted object (documented
/// limitation of the format used here).
fn write_text_literal<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(b"(")?;
    out.write_all(&encode_text_string(&str_to_codepoints(text)))?;
    out.write_all(b")")
}

/// Parse an `<id> 0 obj` header at `pos` (leading whitespace allowed)
/// without consuming anything. Returns the object id on a full match.
fn peek_object_header(input: &[u8], mut pos: usize) -> Option<u32> {
    while pos < input.len() && matches!(input[pos], b' ' | b'\r' | b'\n' | b'\t') {
        pos += 1;
    }
    let digits_start = pos;
    while pos < input.len() && input[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }
    let id: u32 = std::str::from_utf8(&input[digits_start..pos])
        .ok()?
        .parse()
        .ok()?;
    while pos < input.len() && input[pos] == b' ' {
        pos += 1;
    }
    if pos >= input.len() || input[pos] != b'0' {
        return None;
    }
    pos += 1;
    while pos < input.len() && input[pos] == b' ' {
        pos += 1;
    }
    if input.len() < pos + 3 || &input[pos..pos + 3] != b"obj" {
        return None;
    }
    Some(id)
}

/// Emit one outline node object.
///
/// Key order matters to downstream byte-level expectations: `/Title` first,
/// then — for a node with children — `/Count`, `/First`, `/Last`, then
/// `/Dest`, `/Parent`, `/Next`, `/Prev`.
fn emit_node<W: Write>(
    out: &mut W,
    node: &OutlineNode,
    parent_id: u32,
    prev: Option<u32>,
    next: Option<u32>,
) -> Result<(), PatchError> {
    let id = node
        .object_id
        .ok_or_else(|| PatchError::Other("outline node missing object id".to_string()))?;

    write!(out, "{id} 0 obj \n<<\n/Title ")?;
    write_text_literal(out, &node.title)?;
    out.write_all(b"\n")?;

    if !node.children.is_empty() {
        let first = node.children[0]
            .object_id
            .ok_or_else(|| PatchError::Other("outline node missing object id".to_string()))?;
        let last = node.children[node.children.len() - 1]
            .object_id
            .ok_or_else(|| PatchError::Other("outline node missing object id".to_string()))?;
        write!(
            out,
            "/Count {} \n/First {first} 0 R \n/Last {last} 0 R\n",
            node.children.len()
        )?;
    }

    let page = node.dest_page.max(0);
    write!(out, "/Dest [{page} /Fit]\n/Parent {parent_id} 0 R \n")?;
    if let Some(next) = next {
        write!(out, "/Next {next} 0 R \n")?;
    }
    if let Some(prev) = prev {
        write!(out, "/Prev {prev} 0 R \n")?;
    }
    out.write_all(b">>\nendobj\n")?;
    Ok(())
}

/// Emit the outline root object followed by every node, each top-level node
/// immediately followed by its children.
///
/// The root's `/Count` is the flattened total across all levels while each
/// node's own `/Count` covers direct children only — an asymmetry kept
/// exactly as the tool has always written it.
fn emit_outline_objects<W: Write>(
    out: &mut W,
    root_id: u32,
    nodes: &[OutlineNode],
) -> Result<(), PatchError> {
    let missing = || PatchError::Other("outline node missing object id".to_string());
    let first_id = nodes.first().and_then(|n| n.object_id).ok_or_else(missing)?;
    let last_id = nodes.last().and_then(|n| n.object_id).ok_or_else(missing)?;
    let total = total_node_count(nodes);

    write!(out, "\n{root_id} 0 obj \n")?;
    write!(
        out,
        "<<\n/Count {total} \n/First {first_id} 0 R \n/Last {last_id} 0 R\n>>\nendobj \n"
    )?;

    for (i, node) in nodes.iter().enumerate() {
        let prev = if i > 0 { nodes[i - 1].object_id } else { None };
        let next = nodes.get(i + 1).and_then(|n| n.object_id);
        emit_node(out, node, root_id, prev, next)?;

        let parent_id = node.object_id.ok_or_else(missing)?;
        for (j, child) in node.children.iter().enumerate() {
            let child_prev = if j > 0 {
                node.children[j - 1].object_id
            } else {
                None
            };
            let child_next = node.children.get(j + 1).and_then(|c| c.object_id);
            emit_node(out, child, parent_id, child_prev, child_next)?;
        }
    }
    Ok(())
}

/// Emit a new Info object carrying whichever of author/title are present.
fn emit_info_object<W: Write>(
    out: &mut W,
    info_id: u32,
    info: &DocumentInfo,
) -> Result<(), PatchError> {
    write!(out, "\n{info_id} 0 obj \n<<\n")?;
    if let Some(author) = &info.author {
        out.write_all(b"/Author ")?;
        write_text_literal(out, author)?;
        out.write_all(b"\n")?;
    }
    if let Some(title) = &info.title {
        out.write_all(b"/Title ")?;
        write_text_literal(out, title)?;
        out.write_all(b"\n")?;
    }
    out.write_all(b">>\nendobj \n")?;
    Ok(())
}

/// Nested scan over an existing Info object's body.
///
/// Copies bytes through the object's dictionary, noting whether `/Title` and
/// `/Author` already occur; immediately before the dictionary's closing `>>`
/// the missing keys (of those we have values for) are injected. Returns the
/// position just past the `>>`.
fn patch_info_body<W: Write>(
    input: &[u8],
    mut pos: usize,
    out: &mut W,
    info: &DocumentInfo,
) -> Result<usize, PatchError> {
    let mut depth = 0usize;
    let mut has_title = false;
    let mut has_author = false;

    while pos < input.len() {
        let rest = &input[pos..];
        if rest.starts_with(b"<<") {
            depth += 1;
            out.write_all(b"<<")?;
            pos += 2;
        } else if rest.starts_with(b">>") {
            if depth <= 1 {
                let mut injected = false;
                if !has_title {
                    if let Some(title) = &info.title {
                        out.write_all(b"\n/Title ")?;
                        write_text_literal(out, title)?;
                        injected = true;
                    }
                }
                if !has_author {
                    if let Some(author) = &info.author {
                        out.write_all(b"\n/Author ")?;
                        write_text_literal(out, author)?;
                        injected = true;
                    }
                }
                if injected {
                    out.write_all(b"\n")?;
                }
                out.write_all(b">>")?;
                return Ok(pos + 2);
            }
            depth -= 1;
            out.write_all(b">>")?;
            pos += 2;
        } else if rest.starts_with(b"/Title") {
            has_title = true;
            out.write_all(b"/Title")?;
            pos += 6;
        } else if rest.starts_with(b"/Author") {
            has_author = true;
            out.write_all(b"/Author")?;
            pos += 7;
        } else {
            out.write_all(&input[pos..pos + 1])?;
            pos += 1;
        }
    }

    Err(PatchError::UnexpectedEndOfStream {
        offset: pos,
        wanted: 2,
        available: 0,
    })
}

/// Stream `input` to `out`, applying the plan's insertions and patches.
///
/// Everything outside the trigger points is copied byte for byte. With an
/// empty plan the output is identical to the input.
pub fn patch<W: Write>(
    input: &[u8],
    out: &mut W,
    plan: &PatchPlan,
    nodes: &[OutlineNode],
    info: &DocumentInfo,
) -> Result<(), PatchError> {
    let mut catalog_pending = plan.needs_outline_insert();
    let mut outline_objects_pending = plan.needs_outline_insert();
    let mut info_object_pending = plan.needs_info_insert();
    let mut trailer_ref_pending = plan.needs_info_insert();
    let mut info_patch_pending = plan.patch_info_id;

    let root_id = plan.outline_root_id;
    let info_id = plan.info_object_id;

    let mut pos = 0;
    while pos < input.len() {
        if !catalog_pending
            && !outline_objects_pending
            && !info_object_pending
            && !trailer_ref_pending
            && info_patch_pending.is_none()
        {
            // All work done: the rest of the file passes through untouched.
            out.write_all(&input[pos..])?;
            return Ok(());
        }

        let b = input[pos];
        if b == b'C' && catalog_pending {
            out.write_all(&[b])?;
            let look = lookahead(input, pos + 1)?;
            if look == b"atalog" {
                out.write_all(look)?;
                let root = root_id
                    .ok_or_else(|| PatchError::Other("plan has no outline root id".to_string()))?;
                write!(out, "\n/Outlines {root} 0 R \n")?;
                out.write_all(b"/PageMode /UseOutlines\n")?;
                tracing::debug!(offset = pos, "catalog keys injected");
                catalog_pending = false;
                pos += 1 + LOOKAHEAD;
            } else {
                pos += 1;
            }
        } else if b == b't' && trailer_ref_pending {
            out.write_all(&[b])?;
            let look = lookahead(input, pos + 1)?;
            if look == b"railer" {
                out.write_all(look)?;
                pos += 1 + LOOKAHEAD;
                let dict_open = find_subslice(&input[pos..], b"<<").ok_or(
                    PatchError::UnexpectedEndOfStream {
                        offset: pos,
                        wanted: 2,
                        available: 0,
                    },
                )?;
                let after_open = pos + dict_open + 2;
                out.write_all(&input[pos..after_open])?;
                let id = info_id
                    .ok_or_else(|| PatchError::Other("plan has no info object id".to_string()))?;
                write!(out, "\n/Info {id} 0 R \n")?;
                tracing::debug!(offset = pos, "trailer /Info reference injected");
                trailer_ref_pending = false;
                pos = after_open;
            } else {
                pos += 1;
            }
        } else if b == b'e'
            && (outline_objects_pending || info_object_pending || info_patch_pending.is_some())
        {
            out.write_all(&[b])?;
            let look = lookahead(input, pos + 1)?;
            if &look[..5] == b"ndobj" {
                // The sixth byte (whatever follows "endobj") rides along.
                out.write_all(look)?;
                pos += 1 + LOOKAHEAD;

                if outline_objects_pending {
                    let root = root_id.ok_or_else(|| {
                        PatchError::Other("plan has no outline root id".to_string())
                    })?;
                    emit_outline_objects(out, root, nodes)?;
                    tracing::debug!(objects = total_node_count(nodes) + 1, "outline objects appended");
                    outline_objects_pending = false;
                }
                if info_object_pending {
                    let id = info_id.ok_or_else(|| {
                        PatchError::Other("plan has no info object id".to_string())
                    })?;
                    emit_info_object(out, id, info)?;
                    tracing::debug!(object = id, "info object appended");
                    info_object_pending = false;
                }
                if let Some(target) = info_patch_pending {
                    if peek_object_header(input, pos) == Some(target) {
                        pos = patch_info_body(input, pos, out, info)?;
                        tracing::debug!(object = target, "existing info object patched");
                        info_patch_pending = None;
                    }
                }
            } else {
                pos += 1;
            }
        } else {
            out.write_all(&[b])?;
            pos += 1;
        }
    }

    Ok(())
}
