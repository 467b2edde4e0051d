//! Block-to-entry parsing.
//!
//! Takes one raw block emitted by the splitter and produces a [`ChatEntry`].
//! Parsing never fails hard: blocks that do not fit the grammar degrade into
//! a best-effort entry plus a warning, and the pipeline continues.

use tracing::warn;

use crate::entry::{ChatEntry, UNKNOWN_AUTHOR};
use crate::parsing::classify::classify;
use crate::parsing::timestamp::resolve_timestamp;
use crate::parsing::ENTRY_START;

/// Literal marker a transcript places after an attachment filename.
pub const ATTACHMENT_MARKER: &str = " (file attached)";

/// One parsed block: the entry plus an optional degradation warning.
#[derive(Debug, Clone)]
pub struct ParsedBlock {
    /// The parsed (possibly degraded) entry.
    pub entry: ChatEntry,
    /// Present when the block did not fully fit the grammar.
    pub warning: Option<String>,
}

/// Parses one raw block into a [`ChatEntry`].
///
/// - A block without the timestamp prefix degrades into an entry whose
///   payload is the whole block, author [`UNKNOWN_AUTHOR`].
/// - A block without the `": "` author separator degrades into an entry
///   whose payload is everything after the timestamp.
/// - The ` (file attached)` marker splits body into attachment filename and
///   optional caption; a caption keeps no leading line break.
///
/// # Example
///
/// ```
/// use chatvault::parsing::parse_block;
///
/// let parsed = parse_block("9/4/23, 7:34 - Eugene Kurtzer: Test.");
/// assert!(parsed.warning.is_none());
/// assert_eq!(parsed.entry.author, "Eugene Kurtzer");
/// assert_eq!(parsed.entry.payload.as_deref(), Some("Test."));
/// ```
pub fn parse_block(block: &str) -> ParsedBlock {
    let Some(caps) = ENTRY_START.captures(block) else {
        warn!(preview = block_preview(block), "block has no timestamp prefix");
        let payload = non_empty(block.trim());
        let kind = classify(None, payload.as_deref());
        return ParsedBlock {
            entry: ChatEntry {
                timestamp: String::new(),
                resolved_time: None,
                author: UNKNOWN_AUTHOR.to_string(),
                payload,
                attachment: None,
                kind,
                attachment_hash: None,
            },
            warning: Some("entry has no timestamp prefix, stored as-is".to_string()),
        };
    };

    let raw_timestamp = caps.get(1).map_or("", |m| m.as_str());
    let remainder = &block[caps.get(0).map_or(0, |m| m.end())..];

    let (author, body, mut warning) = match remainder.split_once(": ") {
        Some((author, body)) => (author.trim(), body, None),
        None => {
            warn!(timestamp = raw_timestamp, "entry has no author separator");
            (
                "",
                remainder,
                Some(format!(
                    "entry at '{raw_timestamp}' has no author separator"
                )),
            )
        }
    };
    let author = if author.is_empty() {
        UNKNOWN_AUTHOR
    } else {
        author
    };

    let (payload, attachment) = match body.find(ATTACHMENT_MARKER) {
        None => (non_empty(body.trim()), None),
        Some(pos) => {
            let filename = body[..pos].trim().to_string();
            let after = &body[pos + ATTACHMENT_MARKER.len()..];
            let caption = strip_leading_newline(after).trim_end_matches(['\r', '\n']);
            if filename.is_empty() {
                // Marker with nothing before it reads as plain text.
                warning.get_or_insert_with(|| {
                    format!("entry at '{raw_timestamp}' has an attachment marker but no filename")
                });
                (non_empty(body.trim()), None)
            } else {
                (non_empty(caption), Some(filename))
            }
        }
    };

    let resolved_time = resolve_timestamp(raw_timestamp);
    let kind = classify(attachment.as_deref(), payload.as_deref());

    ParsedBlock {
        entry: ChatEntry {
            timestamp: raw_timestamp.to_string(),
            resolved_time,
            author: author.to_string(),
            payload,
            attachment,
            kind,
            attachment_hash: None,
        },
        warning,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn strip_leading_newline(s: &str) -> &str {
    let s = s.strip_prefix('\r').unwrap_or(s);
    s.strip_prefix('\n').unwrap_or(s)
}

fn block_preview(block: &str) -> &str {
    let end = block
        .char_indices()
        .nth(60)
        .map_or(block.len(), |(idx, _)| idx);
    &block[..end]
}
