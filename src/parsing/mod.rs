//! Shared parsing utilities for chat transcripts.
//!
//! This module contains the entry-start pattern, the timestamp resolver, the
//! block-to-entry parser, and the semantic classifier. The block splitter in
//! [`crate::streaming`] shares the same compiled pattern, so boundary
//! detection and parsing can never disagree about what starts an entry.

use std::sync::LazyLock;

use regex::Regex;

pub mod classify;
pub mod entry;
pub mod timestamp;

pub use classify::classify;
pub use entry::{ATTACHMENT_MARKER, ParsedBlock, parse_block};
pub use timestamp::resolve_timestamp;

/// Pattern that opens a new chat entry: `M/D/YY, H:MM - ` with an optional
/// AM/PM marker and 2- or 4-digit year.
///
/// Capture 1 is the raw timestamp substring (date and time, without the
/// ` - ` separator).
pub(crate) static ENTRY_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?:\s?[APap][Mm])?)\s-\s").unwrap()
});

/// Returns `true` if the line opens a new chat entry.
pub fn is_entry_start(line: &str) -> bool {
    ENTRY_START.is_match(line)
}
