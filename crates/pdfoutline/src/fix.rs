//! End-to-end pipeline: open, decide, extract, index, patch.
//!
//! Ties the document backend, the heuristics, and the byte-stream patcher
//! together for one input/output pair. Output goes through a sibling
//! temporary file that is renamed into place on success, so an aborted run
//! never leaves a truncated destination behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pdfoutline_core::outline::total_node_count;
use pdfoutline_core::{
    DocumentInfo, InfoMode, OutlineNode, PatchError, PatchPlan, ScanWarning,
};
use pdfoutline_parse::{DocBackend, LopdfBackend};

use crate::calibrate::calibrate_page_offset;
use crate::content_file::load_content_file;
use crate::extractor::extract_outline;
use crate::patcher::patch;

/// Options for a fix run.
#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    /// Explicit content description or info file; bypasses the heuristic
    /// extractor when it carries outline entries.
    pub content_file: Option<PathBuf>,
    /// Skip page-offset calibration on the heuristic path.
    pub no_calibration: bool,
}

/// What a fix run did.
#[derive(Debug, Clone, Default)]
pub struct FixReport {
    /// Total outline entries written (all levels).
    pub outline_nodes: usize,
    /// Page offset applied by calibration.
    pub page_offset: i64,
    /// A new Info object was inserted.
    pub info_inserted: bool,
    /// An existing Info object was patched in place.
    pub info_patched: bool,
    /// Nothing needed adding; the output is a byte-identical copy.
    pub copied_verbatim: bool,
    /// Non-fatal issues encountered along the way.
    pub warnings: Vec<ScanWarning>,
}

/// Write to `<output>.tmp`, then rename onto `output` on success.
fn write_staged(
    output: &Path,
    write: impl FnOnce(&mut BufWriter<fs::File>) -> Result<(), PatchError>,
) -> Result<(), PatchError> {
    let Some(file_name) = output.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Err(PatchError::DestinationOpen(format!(
            "{}: not a file path",
            output.display()
        )));
    };
    let tmp = output.with_file_name(format!("{file_name}.tmp"));

    let file = fs::File::create(&tmp)
        .map_err(|e| PatchError::DestinationOpen(format!("{}: {e}", tmp.display())))?;
    let mut writer = BufWriter::new(file);
    let result = write(&mut writer).and_then(|()| writer.flush().map_err(PatchError::from));

    match result {
        Ok(()) => fs::rename(&tmp, output)
            .map_err(|e| PatchError::DestinationOpen(format!("{}: {e}", output.display()))),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Reconstruct outline and metadata for `input` and write the patched file
/// to `output`.
///
/// A document that already carries an outline keeps it; a document with
/// nothing to add is copied unchanged. Heuristic extraction failures are
/// never fatal — they produce an empty outline and warnings in the report.
pub fn fix_document(
    input: &Path,
    output: &Path,
    options: &FixOptions,
) -> Result<FixReport, PatchError> {
    let bytes = fs::read(input)
        .map_err(|e| PatchError::SourceOpen(format!("{}: {e}", input.display())))?;
    let doc = LopdfBackend::open(&bytes).map_err(PatchError::from)?;
    tracing::info!(
        input = %input.display(),
        pages = LopdfBackend::page_count(&doc),
        "document opened"
    );

    let mut warnings = Vec::new();

    let has_outline = LopdfBackend::existing_outline(&doc)
        .map_err(PatchError::from)?
        .is_some();
    let existing_info = LopdfBackend::info_object_id(&doc).map_err(PatchError::from)?;

    let mut info = DocumentInfo::default();
    let mut file_nodes: Vec<OutlineNode> = Vec::new();
    if let Some(path) = &options.content_file {
        let outcome = load_content_file(path)?;
        warnings.extend(outcome.warnings);
        info = outcome.value.info;
        file_nodes = outcome.value.nodes;
    }

    let mut nodes: Vec<OutlineNode> = Vec::new();
    let mut page_offset = 0;
    if has_outline {
        tracing::info!("document already has an outline; keeping it");
    } else if !file_nodes.is_empty() {
        nodes = file_nodes;
    } else {
        let outcome = extract_outline::<LopdfBackend>(&doc).map_err(PatchError::from)?;
        warnings.extend(outcome.warnings);
        let mut extraction = outcome.value;
        if !options.no_calibration {
            page_offset =
                calibrate_page_offset::<LopdfBackend>(&doc, &mut extraction).map_err(PatchError::from)?;
        }
        nodes = extraction.nodes;
    }

    let wants_outline = !nodes.is_empty();
    let info_mode = if info.is_empty() {
        InfoMode::None
    } else {
        match existing_info {
            Some(id) => InfoMode::Patch(id),
            None => InfoMode::Insert,
        }
    };

    if !wants_outline && info_mode == InfoMode::None {
        tracing::info!(output = %output.display(), "nothing to add; copying unchanged");
        write_staged(output, |w| w.write_all(&bytes).map_err(PatchError::from))?;
        return Ok(FixReport {
            copied_verbatim: true,
            warnings,
            ..FixReport::default()
        });
    }

    let plan = PatchPlan::new(LopdfBackend::object_count(&doc), wants_outline, info_mode);
    plan.index(&mut nodes);
    tracing::info!(
        outline = wants_outline,
        info_insert = plan.needs_info_insert(),
        info_patch = plan.needs_info_patch(),
        base = plan.base_object_count,
        "patch plan ready"
    );

    write_staged(output, |w| patch(&bytes, w, &plan, &nodes, &info))?;
    tracing::info!(output = %output.display(), "patched file written");

    Ok(FixReport {
        outline_nodes: if wants_outline { total_node_count(&nodes) } else { 0 },
        page_offset,
        info_inserted: plan.needs_info_insert(),
        info_patched: plan.needs_info_patch(),
        copied_verbatim: false,
        warnings,
    })
}
