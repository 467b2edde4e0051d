//! Incremental reconciliation between stored and freshly parsed entries.
//!
//! On re-upload of the same logical chat, the stored entries are diffed
//! against the fresh parse and only the difference is applied: entries in
//! both stay untouched (preserving their row identity and anything attached
//! to it), entries only in storage are deleted, entries only in the upload
//! are inserted.
//!
//! The diff treats both sides as multisets keyed by entry equality:
//! occurrences are counted per key, so a message that legitimately repeats
//! keeps the right number of copies. Buckets of row ids per key make the
//! whole diff linear instead of a quadratic re-scan.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::entry::ChatEntry;
use crate::store::StoredEntry;

/// Equality key for reconciliation.
///
/// Two entries are the same logical message when author, payload,
/// attachment filename, and resolved time all agree. The raw timestamp
/// string and the attachment hash are deliberately excluded: re-exports can
/// reformat timestamps, and hashes only exist for archive uploads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    author: String,
    payload: Option<String>,
    attachment: Option<String>,
    resolved_time: Option<DateTime<Utc>>,
}

impl EntryKey {
    /// Builds the equality key of an entry.
    pub fn of(entry: &ChatEntry) -> Self {
        Self {
            author: entry.author.clone(),
            payload: entry.payload.clone(),
            attachment: entry.attachment.clone(),
            resolved_time: entry.resolved_time,
        }
    }
}

/// Minimal change set produced by [`reconcile`].
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    /// Row ids to delete (stored entries absent from the upload).
    pub delete: Vec<u64>,
    /// Entries to insert (upload entries absent from storage).
    pub insert: Vec<ChatEntry>,
    /// How many entries matched and stay untouched.
    pub kept: usize,
}

/// Diffs the stored entries of a chat against a fresh parse.
///
/// Multiplicity matters: with existing `{a, a, b, c}` and incoming
/// `{a, b, c, d}`, the plan deletes exactly one copy of `a` and inserts `d`.
///
/// An empty existing set degenerates to "insert everything", so callers may
/// run reconciliation unconditionally.
pub fn reconcile(existing: &[StoredEntry], incoming: Vec<ChatEntry>) -> ReconcilePlan {
    // Bucket stored row ids per equality key.
    let mut buckets: HashMap<EntryKey, Vec<u64>> = HashMap::new();
    for row in existing {
        buckets.entry(EntryKey::of(&row.entry)).or_default().push(row.id);
    }

    let mut plan = ReconcilePlan::default();

    for entry in incoming {
        match buckets.get_mut(&EntryKey::of(&entry)) {
            Some(ids) if !ids.is_empty() => {
                ids.pop();
                plan.kept += 1;
            }
            _ => plan.insert.push(entry),
        }
    }

    // Whatever is left in the buckets has no incoming counterpart.
    for ids in buckets.into_values() {
        plan.delete.extend(ids);
    }
    plan.delete.sort_unstable();

    plan
}
