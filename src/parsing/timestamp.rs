//! Timestamp resolution against the known export formats.
//!
//! Chat exports write timestamps a few different ways depending on device
//! locale. Resolution tries a fixed, ordered list of formats and takes the
//! first that parses; an unresolvable timestamp is not an error, the entry
//! just loses chronological ordering.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

/// Known timestamp formats, in priority order.
///
/// 12-hour forms with an AM/PM marker come first, then 24-hour fallbacks;
/// 2-digit years before 4-digit. chrono accepts unpadded month, day, and
/// hour fields, so `9/4/23, 7:34` and `09/04/23, 07:34` both parse.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%y, %I:%M %p",
    "%m/%d/%Y, %I:%M %p",
    "%m/%d/%y, %H:%M",
    "%m/%d/%Y, %H:%M",
];

/// Parses a raw timestamp substring into an instant.
///
/// Returns `None` when no known format matches; the failure is logged and
/// the caller keeps the entry with `resolved_time` unset.
///
/// # Example
///
/// ```
/// use chatvault::parsing::resolve_timestamp;
///
/// assert!(resolve_timestamp("9/4/23, 7:34").is_some());
/// assert!(resolve_timestamp("9/4/23, 7:34 PM").is_some());
/// assert!(resolve_timestamp("not a timestamp").is_none());
/// ```
pub fn resolve_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    debug!(timestamp = trimmed, "no known format matched timestamp");
    None
}
