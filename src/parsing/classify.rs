//! Semantic classification of parsed entries.
//!
//! Classification is table-driven: an ordered extension table for attachments
//! and an ordered prefix table for payloads. Adding a new kind means adding a
//! table row, not another branch.

use crate::entry::EntryKind;

/// Extension-to-kind rule for attachment filenames.
struct ExtensionRule {
    kind: EntryKind,
    extensions: &'static [&'static str],
}

/// Extension rules, evaluated in order against the lower-cased extension.
const EXTENSION_RULES: &[ExtensionRule] = &[
    ExtensionRule {
        kind: EntryKind::Image,
        extensions: &["jpg", "jpeg", "png"],
    },
    ExtensionRule {
        kind: EntryKind::Video,
        extensions: &["mp4", "mov"],
    },
    ExtensionRule {
        kind: EntryKind::Audio,
        extensions: &["aac", "mp3", "wav"],
    },
    ExtensionRule {
        kind: EntryKind::Sticker,
        extensions: &["webp"],
    },
    ExtensionRule {
        kind: EntryKind::Contact,
        extensions: &["vcf"],
    },
    ExtensionRule {
        kind: EntryKind::Document,
        extensions: &["doc", "docx", "pdf", "ppt", "pptx", "xls", "xlsx"],
    },
];

/// Payload-prefix rules, evaluated in order. Prefix matching is exact.
const PREFIX_RULES: &[(&str, EntryKind)] = &[
    ("location:", EntryKind::Location),
    ("POLL:", EntryKind::Poll),
];

/// Classifies an entry from its attachment filename and payload.
///
/// An attachment filename wins over the payload: the extension decides the
/// kind, with unrecognized extensions falling back to [`EntryKind::File`].
/// Without an attachment, the payload prefix decides; plain content is
/// [`EntryKind::Text`]. Neither present is [`EntryKind::Unknown`].
///
/// # Example
///
/// ```
/// use chatvault::parsing::classify;
/// use chatvault::EntryKind;
///
/// assert_eq!(classify(Some("IMG-001.jpg"), None), EntryKind::Image);
/// assert_eq!(classify(None, Some("location: 48.85,2.35")), EntryKind::Location);
/// assert_eq!(classify(None, Some("hello")), EntryKind::Text);
/// assert_eq!(classify(None, None), EntryKind::Unknown);
/// ```
pub fn classify(attachment: Option<&str>, payload: Option<&str>) -> EntryKind {
    if let Some(filename) = attachment {
        if let Some((_, ext)) = filename.rsplit_once('.') {
            let ext = ext.to_ascii_lowercase();
            for rule in EXTENSION_RULES {
                if rule.extensions.contains(&ext.as_str()) {
                    return rule.kind;
                }
            }
        }
        return EntryKind::File;
    }

    if let Some(text) = payload {
        for (prefix, kind) in PREFIX_RULES {
            if text.starts_with(prefix) {
                return *kind;
            }
        }
        return EntryKind::Text;
    }

    EntryKind::Unknown
}
