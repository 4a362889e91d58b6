use std::path::PathBuf;

use clap::Parser;

/// Reconstruct a PDF's outline and metadata and write a patched copy.
///
/// Scans the document's own printed contents page to rebuild the bookmark
/// tree when the file carries none, and fills in title/author metadata. The
/// output file is the input byte stream with the new objects spliced in.
#[derive(Debug, Parser)]
#[command(name = "pdfoutline", about, version)]
pub struct Cli {
    /// Path to the source PDF
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the patched PDF
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Optional content description (text) or info file (JSON)
    #[arg(value_name = "CONTENT_OR_INFO_FILE")]
    pub content: Option<PathBuf>,

    /// Skip page-offset calibration of extracted entries
    #[arg(long)]
    pub no_calibration: bool,
}
