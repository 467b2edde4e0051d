//! Single-pass ZIP walker.
//!
//! Walks an archive stream entry-by-entry using the local headers only — no
//! seek back to a central directory, so the input can be a pipe or network
//! stream. The transcript member is buffered for parsing after the walk;
//! every other member is hashed in place.

use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, warn};

use crate::archive::hash::{HashStreamError, hash_stream};
use crate::config::{Deadline, IngestLimits};
use crate::error::{ChatvaultError, Result};

/// File extensions treated as the chat transcript.
pub const TRANSCRIPT_EXTENSIONS: &[&str] = &["txt", "text", "log"];

/// Everything one archive walk produces.
#[derive(Debug, Default)]
pub struct ArchiveScan {
    /// Decompressed transcript bytes, when a transcript member was found.
    pub transcript: Option<Vec<u8>>,
    /// Base name of the transcript member.
    pub transcript_name: Option<String>,
    /// Base name → lower-case hex SHA-256, for every hashed media member.
    pub file_hashes: HashMap<String, String>,
    /// Base names of hashed media members, in stored order.
    pub extracted_names: Vec<String>,
    /// Per-member partial failures (oversized members, duplicate transcripts).
    pub warnings: Vec<String>,
}

/// Walks a ZIP stream in stored order, within the given limits.
///
/// - Directory members are skipped.
/// - A transcript member (`txt`, `text`, `log`) is buffered fully; if several
///   match, the last one wins and a warning records the ambiguity.
/// - Every other member streams through the hasher. A member over the
///   per-file ceiling fails only that member — it lands in
///   [`ArchiveScan::warnings`] and the walk continues.
/// - Exceeding the member-count ceiling or the deadline aborts the walk.
pub fn walk_archive<R: Read>(
    mut reader: R,
    limits: &IngestLimits,
    deadline: &Deadline,
) -> Result<ArchiveScan> {
    let mut scan = ArchiveScan::default();
    let mut members = 0usize;

    while let Some(mut member) = zip::read::read_zipfile_from_stream(&mut reader)? {
        deadline.check()?;

        members += 1;
        if members > limits.max_archive_members {
            return Err(ChatvaultError::TooManyMembers {
                limit: limits.max_archive_members,
            });
        }

        if member.is_dir() {
            continue;
        }

        let base = base_name(member.name()).to_string();

        if is_transcript_name(&base) {
            match read_bounded(&mut member, limits.max_attachment_bytes)? {
                Some(bytes) => {
                    if let Some(previous) = scan.transcript_name.replace(base.clone()) {
                        scan.warnings.push(format!(
                            "archive holds several transcripts; using '{base}' over '{previous}'"
                        ));
                    }
                    debug!(name = %base, bytes = bytes.len(), "buffered transcript member");
                    scan.transcript = Some(bytes);
                }
                None => {
                    scan.warnings.push(format!(
                        "skipped transcript '{base}': exceeds the {}-byte limit",
                        limits.max_attachment_bytes
                    ));
                }
            }
        } else {
            match hash_stream(&mut member, limits.max_attachment_bytes) {
                Ok(hash) => {
                    debug!(name = %base, hash = %hash, "hashed archive member");
                    scan.file_hashes.insert(base.clone(), hash);
                    scan.extracted_names.push(base);
                }
                Err(HashStreamError::LimitExceeded { limit }) => {
                    warn!(name = %base, limit, "archive member exceeds the size limit");
                    scan.warnings
                        .push(format!("skipped '{base}': exceeds the {limit}-byte limit"));
                }
                Err(HashStreamError::Io(e)) => return Err(e.into()),
            }
        }
    }

    Ok(scan)
}

/// Strips any directory components from a member name.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

fn is_transcript_name(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| TRANSCRIPT_EXTENSIONS.contains(&ext.as_str()))
}

/// Reads a stream fully, up to `limit` bytes; `None` when the stream is
/// larger than the limit.
fn read_bounded<R: Read>(reader: &mut R, limit: u64) -> Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    reader.take(limit + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > limit {
        return Ok(None);
    }
    Ok(Some(buf))
}
