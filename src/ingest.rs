//! Top-level ingestion driver.
//!
//! [`Ingestor`] ties the pipeline together: resolve the logical chat key,
//! run the text or archive pipeline, reconcile against stored history when
//! the chat already exists, record attachments content-addressed, and report
//! an [`UploadSummary`].
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use chatvault::ingest::{Ingestor, SourceKind};
//! use chatvault::store::{MemoryAttachmentStore, MemoryEntryRepository};
//!
//! let mut repo = MemoryEntryRepository::new();
//! let mut attachments = MemoryAttachmentStore::new();
//! let mut ingestor = Ingestor::new(&mut repo, &mut attachments);
//!
//! let summary = ingestor.ingest(
//!     "user-1",
//!     "family chat.txt",
//!     SourceKind::Text,
//!     Cursor::new("9/4/23, 7:34 - Eugene Kurtzer: Test."),
//! );
//!
//! assert!(summary.success);
//! assert_eq!(summary.entry_count, 1);
//! ```

use std::collections::HashMap;
use std::io::{BufRead, Cursor};

use chrono::Utc;
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::archive::walk_archive;
use crate::config::{Deadline, IngestLimits};
use crate::entry::ChatEntry;
use crate::error::{ChatvaultError, Result};
use crate::parsing::parse_block;
use crate::reconcile::reconcile;
use crate::store::{AttachmentStore, EntryRepository};
use crate::streaming::BlockSplitter;

/// Delimiter between the normalized chat name and its uniquifying suffix.
const KEY_DELIMITER: char = '#';

/// What kind of upload the caller declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain UTF-8 transcript
    Text,
    /// ZIP archive holding a transcript plus media
    Archive,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Text => write!(f, "text"),
            SourceKind::Archive => write!(f, "archive"),
        }
    }
}

/// Outcome report for one upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    /// Resolved logical chat key (empty when resolution itself failed)
    pub chat_key: String,
    /// Original filename as uploaded
    pub source_file_name: String,
    /// Declared source kind
    pub source_kind: SourceKind,
    /// Number of entries parsed from the transcript
    pub entry_count: usize,
    /// Number of archive members hashed
    pub attachment_count: usize,
    /// Base names of hashed archive members
    pub extracted_file_names: Vec<String>,
    /// Per-entry and per-file partial failures
    pub warnings: Vec<String>,
    /// Wall-clock time spent on the upload
    pub elapsed_millis: u64,
    /// `false` when a fatal error aborted the upload
    pub success: bool,
    /// User-facing reason when `success` is `false`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// What a successful pipeline run produced, pre-summary.
#[derive(Debug, Default)]
struct PipelineOutcome {
    entry_count: usize,
    attachment_count: usize,
    extracted_file_names: Vec<String>,
}

/// Top-level ingestion driver over a pair of storage collaborators.
pub struct Ingestor<'a> {
    entries: &'a mut dyn EntryRepository,
    attachments: &'a mut dyn AttachmentStore,
    limits: IngestLimits,
}

impl<'a> Ingestor<'a> {
    /// Creates an ingestor with default limits.
    pub fn new(
        entries: &'a mut dyn EntryRepository,
        attachments: &'a mut dyn AttachmentStore,
    ) -> Self {
        Self::with_limits(entries, attachments, IngestLimits::default())
    }

    /// Creates an ingestor with explicit limits.
    pub fn with_limits(
        entries: &'a mut dyn EntryRepository,
        attachments: &'a mut dyn AttachmentStore,
        limits: IngestLimits,
    ) -> Self {
        Self {
            entries,
            attachments,
            limits,
        }
    }

    /// Ingests one upload and reports a summary.
    ///
    /// Never panics and never returns `Err`: fatal errors surface in the
    /// summary with `success = false` and a classified, user-facing message.
    pub fn ingest<R: BufRead>(
        &mut self,
        owner_id: &str,
        file_name: &str,
        kind: SourceKind,
        reader: R,
    ) -> UploadSummary {
        let deadline = self.limits.start_deadline();
        let mut warnings = Vec::new();

        let chat_key = match resolve_chat_key(self.entries, owner_id, file_name) {
            Ok(key) => key,
            Err(e) => {
                let err = ChatvaultError::from(e);
                warn!(owner = owner_id, file = file_name, error = %err, "chat key resolution failed");
                return UploadSummary {
                    chat_key: String::new(),
                    source_file_name: file_name.to_string(),
                    source_kind: kind,
                    entry_count: 0,
                    attachment_count: 0,
                    extracted_file_names: Vec::new(),
                    warnings,
                    elapsed_millis: deadline.elapsed_ms(),
                    success: false,
                    error_message: Some(err.user_message()),
                };
            }
        };

        let result = self.run_pipeline(owner_id, &chat_key, kind, reader, &deadline, &mut warnings);

        match result {
            Ok(outcome) => {
                info!(
                    owner = owner_id,
                    chat_key = %chat_key,
                    entries = outcome.entry_count,
                    attachments = outcome.attachment_count,
                    "upload ingested"
                );
                UploadSummary {
                    chat_key,
                    source_file_name: file_name.to_string(),
                    source_kind: kind,
                    entry_count: outcome.entry_count,
                    attachment_count: outcome.attachment_count,
                    extracted_file_names: outcome.extracted_file_names,
                    warnings,
                    elapsed_millis: deadline.elapsed_ms(),
                    success: true,
                    error_message: None,
                }
            }
            Err(e) => {
                warn!(owner = owner_id, chat_key = %chat_key, error = %e, "upload aborted");
                UploadSummary {
                    chat_key,
                    source_file_name: file_name.to_string(),
                    source_kind: kind,
                    entry_count: 0,
                    attachment_count: 0,
                    extracted_file_names: Vec::new(),
                    warnings,
                    elapsed_millis: deadline.elapsed_ms(),
                    success: false,
                    error_message: Some(e.user_message()),
                }
            }
        }
    }

    fn run_pipeline<R: BufRead>(
        &mut self,
        owner_id: &str,
        chat_key: &str,
        kind: SourceKind,
        reader: R,
        deadline: &Deadline,
        warnings: &mut Vec<String>,
    ) -> Result<PipelineOutcome> {
        // Checked before parsing so a re-upload is reconciled, not duplicated.
        let pre_existing = self
            .entries
            .exists_by_owner_and_chat_key(owner_id, chat_key)?;

        let (parsed, attachment_count, extracted_file_names) = match kind {
            SourceKind::Text => (self.parse_transcript(reader, deadline, warnings)?, 0, Vec::new()),
            SourceKind::Archive => {
                let mut scan = walk_archive(reader, &self.limits, deadline)?;
                warnings.append(&mut scan.warnings);

                let mut parsed = match scan.transcript.take() {
                    Some(bytes) => {
                        let text = String::from_utf8(bytes)
                            .map_err(|e| ChatvaultError::utf8("archive transcript", e))?;
                        self.parse_transcript(Cursor::new(text), deadline, warnings)?
                    }
                    None => {
                        warnings.push("no transcript found in archive".to_string());
                        Vec::new()
                    }
                };

                link_attachments(&mut parsed, &scan.file_hashes);
                self.record_attachments(owner_id, &scan.file_hashes, &mut parsed, warnings);

                (parsed, scan.file_hashes.len(), scan.extracted_names)
            }
        };

        let entry_count = parsed.len();
        deadline.check()?;

        if pre_existing {
            let existing = self.entries.find_by_owner_and_chat_key(owner_id, chat_key)?;
            let plan = reconcile(&existing, parsed);
            info!(
                chat_key = %chat_key,
                kept = plan.kept,
                deleted = plan.delete.len(),
                inserted = plan.insert.len(),
                "reconciled re-upload"
            );
            for id in plan.delete {
                self.entries.delete_by_id(id)?;
            }
            for entry in plan.insert {
                self.entries.save(owner_id, chat_key, entry)?;
            }
        } else {
            for entry in parsed {
                self.entries.save(owner_id, chat_key, entry)?;
            }
        }

        Ok(PipelineOutcome {
            entry_count,
            attachment_count,
            extracted_file_names,
        })
    }

    /// Splits and parses a transcript stream, enforcing the entry ceiling.
    fn parse_transcript<R: BufRead>(
        &self,
        reader: R,
        deadline: &Deadline,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<ChatEntry>> {
        let mut entries = Vec::new();

        for block in BlockSplitter::new(reader) {
            let block = block?;
            let parsed = parse_block(&block);
            if let Some(warning) = parsed.warning {
                warnings.push(warning);
            }
            entries.push(parsed.entry);

            if entries.len() > self.limits.max_entries {
                return Err(ChatvaultError::TooManyEntries {
                    limit: self.limits.max_entries,
                });
            }
            if entries.len() % 256 == 0 {
                deadline.check()?;
            }
        }

        Ok(entries)
    }

    /// Upserts one object and one location per hashed archive member.
    ///
    /// A storage failure skips that attachment: the warning is recorded and
    /// any entry pointing at it keeps its filename but loses the hash link.
    fn record_attachments(
        &mut self,
        owner_id: &str,
        file_hashes: &HashMap<String, String>,
        parsed: &mut [ChatEntry],
        warnings: &mut Vec<String>,
    ) {
        let mut names: Vec<&String> = file_hashes.keys().collect();
        names.sort_unstable();

        for name in names {
            let hash = &file_hashes[name];
            let stored = match self.attachments.upsert_object(hash) {
                Ok(_) => self
                    .attachments
                    .upsert_location(name, owner_id, hash)
                    .map(|_| ()),
                Err(e) => Err(e),
            };

            if let Err(e) = stored {
                warn!(filename = %name, error = %e, "attachment upsert failed, skipping");
                warnings.push(format!("attachment '{name}' not stored: {e}"));
                for entry in parsed.iter_mut() {
                    if entry.attachment.as_deref() == Some(name.as_str()) {
                        entry.attachment_hash = None;
                    }
                }
            }
        }
    }
}

/// Sets `attachment_hash` on every entry whose filename was hashed during
/// the walk; entries referencing files absent from the archive stay
/// unlinked.
fn link_attachments(entries: &mut [ChatEntry], file_hashes: &HashMap<String, String>) {
    for entry in entries.iter_mut() {
        let Some(name) = entry.attachment.as_deref() else {
            continue;
        };
        match file_hashes.get(name) {
            Some(hash) => entry.attachment_hash = Some(hash.clone()),
            None => {
                warn!(filename = name, "transcript references a file missing from the archive");
            }
        }
    }
}

/// Resolves the stable chat key for (owner, file name).
///
/// The key is `normalized-name '#' suffix`. A re-upload of the same file
/// name finds the existing key by exact normalized-name equality; only a
/// first upload mints a fresh suffix (upload time plus a random token), so
/// unrelated files that normalize identically at different times stay
/// separate chats while re-uploads reconcile into one.
fn resolve_chat_key(
    repo: &dyn EntryRepository,
    owner_id: &str,
    file_name: &str,
) -> crate::store::StoreResult<String> {
    let base = normalize_chat_name(file_name);

    for key in repo.chat_keys_by_owner(owner_id)? {
        if key
            .split_once(KEY_DELIMITER)
            .is_some_and(|(existing_base, _)| existing_base == base)
        {
            return Ok(key);
        }
    }

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    Ok(format!(
        "{base}{KEY_DELIMITER}{}-{}",
        Utc::now().timestamp_millis(),
        token.to_lowercase()
    ))
}

/// Normalizes an uploaded file name into a chat-key base: path and extension
/// stripped, lower-cased, non-alphanumerics collapsed to single dashes.
fn normalize_chat_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);

    let mut normalized = String::with_capacity(stem.len());
    let mut last_was_dash = false;
    for ch in stem.chars() {
        if ch.is_alphanumeric() {
            normalized.extend(ch.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && !normalized.is_empty() {
            normalized.push('-');
            last_was_dash = true;
        }
    }
    while normalized.ends_with('-') {
        normalized.pop();
    }

    if normalized.is_empty() {
        return "chat".to_string();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAttachmentStore, MemoryEntryRepository};

    #[test]
    fn test_normalize_chat_name() {
        assert_eq!(normalize_chat_name("Family Chat.txt"), "family-chat");
        assert_eq!(normalize_chat_name("exports/2023/Family Chat.txt"), "family-chat");
        assert_eq!(normalize_chat_name("chat__with   spaces!!.zip"), "chat-with-spaces");
        assert_eq!(normalize_chat_name("no_extension"), "no-extension");
        assert_eq!(normalize_chat_name("...."), "chat");
        assert_eq!(normalize_chat_name(""), "chat");
    }

    #[test]
    fn test_chat_key_minted_with_suffix() {
        let repo = MemoryEntryRepository::new();
        let key = resolve_chat_key(&repo, "owner", "Family Chat.txt").unwrap();
        let (base, suffix) = key.split_once(KEY_DELIMITER).unwrap();
        assert_eq!(base, "family-chat");
        assert!(!suffix.is_empty());
    }

    #[test]
    fn test_reupload_resolves_to_same_key() {
        let mut repo = MemoryEntryRepository::new();
        let first = resolve_chat_key(&repo, "owner", "Family Chat.txt").unwrap();
        repo.save("owner", &first, ChatEntry::text("9/4/23, 7:34", "A", "x"))
            .unwrap();

        let second = resolve_chat_key(&repo, "owner", "Family Chat.txt").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_names_get_distinct_keys() {
        let mut repo = MemoryEntryRepository::new();
        let first = resolve_chat_key(&repo, "owner", "Family Chat.txt").unwrap();
        repo.save("owner", &first, ChatEntry::text("9/4/23, 7:34", "A", "x"))
            .unwrap();

        let other = resolve_chat_key(&repo, "owner", "Work Chat.txt").unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_exact_base_match_not_prefix() {
        let mut repo = MemoryEntryRepository::new();
        let first = resolve_chat_key(&repo, "owner", "team.txt").unwrap();
        repo.save("owner", &first, ChatEntry::text("9/4/23, 7:34", "A", "x"))
            .unwrap();

        // "team-lunch" starts with "team" but must not merge into it.
        let other = resolve_chat_key(&repo, "owner", "team lunch.txt").unwrap();
        assert_ne!(first.split_once(KEY_DELIMITER), other.split_once(KEY_DELIMITER));
        assert!(other.starts_with("team-lunch#"));
    }

    #[test]
    fn test_keys_are_scoped_per_owner() {
        let mut repo = MemoryEntryRepository::new();
        let first = resolve_chat_key(&repo, "owner-a", "chat.txt").unwrap();
        repo.save("owner-a", &first, ChatEntry::text("9/4/23, 7:34", "A", "x"))
            .unwrap();

        let other = resolve_chat_key(&repo, "owner-b", "chat.txt").unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Text.to_string(), "text");
        assert_eq!(SourceKind::Archive.to_string(), "archive");
    }

    #[test]
    fn test_link_attachments() {
        let mut entries = vec![
            ChatEntry::media("9/4/23, 7:34", "A", "photo.png", None),
            ChatEntry::media("9/4/23, 7:35", "A", "missing.png", None),
            ChatEntry::text("9/4/23, 7:36", "A", "plain"),
        ];
        let mut hashes = HashMap::new();
        hashes.insert("photo.png".to_string(), "abc123".to_string());

        link_attachments(&mut entries, &hashes);

        assert_eq!(entries[0].attachment_hash.as_deref(), Some("abc123"));
        assert!(entries[1].attachment_hash.is_none());
        assert!(entries[2].attachment_hash.is_none());
    }

    #[test]
    fn test_entry_ceiling_is_fatal() {
        let mut repo = MemoryEntryRepository::new();
        let mut attachments = MemoryAttachmentStore::new();
        let limits = IngestLimits::new().with_max_entries(2);
        let mut ingestor = Ingestor::with_limits(&mut repo, &mut attachments, limits);

        let transcript = "9/4/23, 7:34 - A: one\n9/4/23, 7:35 - A: two\n9/4/23, 7:36 - A: three\n";
        let summary = ingestor.ingest(
            "owner",
            "chat.txt",
            SourceKind::Text,
            Cursor::new(transcript),
        );

        assert!(!summary.success);
        assert!(summary.error_message.unwrap().contains("maximum of 2"));
        assert!(repo.is_empty());
    }
}
