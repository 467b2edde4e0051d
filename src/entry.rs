//! Core entry type for parsed chat messages.
//!
//! This module provides [`ChatEntry`], the structured representation of one
//! logical chat message reconstructed from a raw transcript block, and
//! [`EntryKind`], its semantic classification.
//!
//! # Overview
//!
//! An entry consists of:
//! - **Always present**: `timestamp` (raw, as found in the source) and
//!   `author` (defaults to `"Unknown"` when the source gives none)
//! - **Content**: `payload` and/or `attachment` — a plain message carries only
//!   a payload, a media message carries an attachment filename and may carry a
//!   payload as caption text
//! - **Enrichment**: `resolved_time` (parsed instant, `None` when no known
//!   format matched), `kind` (classification), `attachment_hash` (set after
//!   archive linking)
//!
//! # Examples
//!
//! ```
//! use chatvault::ChatEntry;
//!
//! let entry = ChatEntry::text("9/4/23, 7:34", "Alice", "Hello!");
//! assert_eq!(entry.author, "Alice");
//! assert_eq!(entry.payload.as_deref(), Some("Hello!"));
//! assert!(entry.attachment.is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default author name for entries whose source block names nobody.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Semantic classification of a chat entry.
///
/// Assigned by the classifier from the attachment filename's extension, or
/// from the payload prefix when there is no attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Plain text message
    Text,
    /// Image attachment (jpg, jpeg, png)
    Image,
    /// Video attachment (mp4, mov)
    Video,
    /// Audio attachment (aac, mp3, wav)
    Audio,
    /// Office or PDF document
    Document,
    /// Contact card (vcf)
    Contact,
    /// Shared location (payload prefix)
    Location,
    /// Poll (payload prefix)
    Poll,
    /// Sticker (webp)
    Sticker,
    /// Attachment with an unrecognized extension
    File,
    /// Neither payload nor attachment present
    #[default]
    Unknown,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntryKind::Text => "text",
            EntryKind::Image => "image",
            EntryKind::Video => "video",
            EntryKind::Audio => "audio",
            EntryKind::Document => "document",
            EntryKind::Contact => "contact",
            EntryKind::Location => "location",
            EntryKind::Poll => "poll",
            EntryKind::Sticker => "sticker",
            EntryKind::File => "file",
            EntryKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// One parsed chat entry, pre-persistence.
///
/// Entries are produced per upload and handed to the reconciliation and
/// storage layers; the core does not retain them afterwards.
///
/// # Serialization
///
/// Optional fields are omitted from JSON when `None`; the resolved time uses
/// RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Timestamp exactly as it appeared in the source block.
    ///
    /// Empty when the block had no recognizable timestamp prefix.
    pub timestamp: String,

    /// Parsed instant, when one of the known formats matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub resolved_time: Option<DateTime<Utc>>,

    /// Display name of the message author.
    pub author: String,

    /// Free-text content. For media entries this is the caption, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub payload: Option<String>,

    /// Attachment filename as referenced by the transcript.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub attachment: Option<String>,

    /// Semantic classification.
    pub kind: EntryKind,

    /// Content hash of the attachment, linked after an archive walk.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub attachment_hash: Option<String>,
}

impl ChatEntry {
    /// Creates a plain text entry.
    pub fn text(
        timestamp: impl Into<String>,
        author: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            resolved_time: None,
            author: author.into(),
            payload: Some(payload.into()),
            attachment: None,
            kind: EntryKind::Text,
            attachment_hash: None,
        }
    }

    /// Creates a media entry with an optional caption.
    pub fn media(
        timestamp: impl Into<String>,
        author: impl Into<String>,
        attachment: impl Into<String>,
        caption: Option<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            resolved_time: None,
            author: author.into(),
            payload: caption,
            attachment: Some(attachment.into()),
            kind: EntryKind::Unknown,
            attachment_hash: None,
        }
    }

    /// Returns `true` if this entry carries an attachment filename.
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// Returns `true` if the entry has neither payload nor attachment.
    pub fn is_empty(&self) -> bool {
        self.payload.as_deref().map_or(true, |p| p.trim().is_empty())
            && self.attachment.is_none()
    }
}
