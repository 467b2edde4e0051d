//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`SourceArg`] - Declared upload kind, with extension-based inference

use std::path::Path;

use clap::{Parser, ValueEnum};

use crate::config::IngestLimits;
use crate::ingest::SourceKind;

/// Ingest an exported chat — a plain transcript or a ZIP with media —
/// into structured, deduplicated records.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatvault")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatvault \"WhatsApp Chat with Eugene.txt\"
    chatvault export.zip --owner alice
    chatvault export.zip --json
    chatvault chat.txt --kind text --max-entries 50000")]
pub struct Args {
    /// Path to the upload (txt transcript or zip archive)
    pub input: String,

    /// Upload kind; inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub kind: Option<SourceArg>,

    /// Uploading identity the chat is filed under
    #[arg(long, default_value = "local")]
    pub owner: String,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Per-file size ceiling in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Entry-count ceiling per upload
    #[arg(long, value_name = "COUNT")]
    pub max_entries: Option<usize>,

    /// Archive member-count ceiling
    #[arg(long, value_name = "COUNT")]
    pub max_members: Option<usize>,

    /// Wall-clock ceiling in milliseconds
    #[arg(long, value_name = "MILLIS")]
    pub max_millis: Option<u64>,
}

impl Args {
    /// Resolves the effective source kind, inferring from the extension
    /// when none was declared.
    pub fn source_kind(&self) -> SourceKind {
        match self.kind {
            Some(arg) => arg.into(),
            None => infer_kind(&self.input),
        }
    }

    /// Builds limits from the defaults plus any per-flag overrides.
    pub fn limits(&self) -> IngestLimits {
        let mut limits = IngestLimits::default();
        if let Some(bytes) = self.max_file_bytes {
            limits = limits.with_max_attachment_bytes(bytes);
        }
        if let Some(count) = self.max_entries {
            limits = limits.with_max_entries(count);
        }
        if let Some(count) = self.max_members {
            limits = limits.with_max_archive_members(count);
        }
        if let Some(millis) = self.max_millis {
            limits = limits.with_max_elapsed_ms(millis);
        }
        limits
    }
}

/// Declared upload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Plain UTF-8 transcript
    Text,
    /// ZIP archive with transcript plus media
    Archive,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Text => SourceKind::Text,
            SourceArg::Archive => SourceKind::Archive,
        }
    }
}

/// Infers the upload kind from the file extension: `zip` means archive,
/// anything else is treated as a transcript.
pub fn infer_kind(path: &str) -> SourceKind {
    let is_zip = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        SourceKind::Archive
    } else {
        SourceKind::Text
    }
}
