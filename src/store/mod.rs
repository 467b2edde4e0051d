//! Storage collaborator contracts.
//!
//! The core does not own persistence. It talks to two collaborators: an
//! [`EntryRepository`] holding the per-chat entry rows, and an
//! [`AttachmentStore`] holding content-addressed attachment objects and
//! their (filename, owner) locations. Both are plain traits so callers can
//! back them with whatever they like; [`memory`] ships in-process
//! implementations used by the CLI and the test suite.
//!
//! The core assumes read-after-write consistency within one upload session
//! and nothing more — notably no atomicity across an object upsert and its
//! location upsert.

pub mod memory;

pub use memory::{MemoryAttachmentStore, MemoryEntryRepository};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::ChatEntry;
use crate::error::ChatvaultError;

/// Page size used when draining a chat's stored entries.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Error raised by a storage collaborator.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    /// Creates a storage error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<StoreError> for ChatvaultError {
    fn from(err: StoreError) -> Self {
        ChatvaultError::Storage(err.0)
    }
}

/// A specialized result type for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Active/inactive flag on attachment records.
///
/// The core only ever writes `Active`; flipping to `Inactive` is an external
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStatus {
    /// Record is live
    #[default]
    Active,
    /// Record has been retired externally
    Inactive,
}

/// A persisted chat entry row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Repository-assigned identity
    pub id: u64,
    /// Uploading identity the row belongs to
    pub owner_id: String,
    /// Logical chat the row belongs to
    pub chat_key: String,
    /// The entry itself
    pub entry: ChatEntry,
}

/// A content-addressed attachment object.
///
/// Created once per unique content; re-encountering identical bytes only
/// refreshes `last_seen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentObject {
    /// Lower-case hex SHA-256 of the content
    pub content_hash: String,
    /// Refreshed on every re-encounter
    pub last_seen: DateTime<Utc>,
    /// Active/inactive flag
    pub status: ObjectStatus,
}

/// A (filename, owner) location pointing at an attachment object.
///
/// Several locations may point at one object — that is the dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentLocation {
    /// Original filename of the upload
    pub filename: String,
    /// Owning identity
    pub owner_id: String,
    /// Hash of the object this location points at
    pub content_hash: String,
    /// Refreshed on every re-encounter
    pub last_seen: DateTime<Utc>,
    /// Active/inactive flag
    pub status: ObjectStatus,
}

/// Persistence contract for chat entry rows.
pub trait EntryRepository {
    /// Persists one entry under (owner, chat key), returning the stored row.
    fn save(&mut self, owner_id: &str, chat_key: &str, entry: ChatEntry)
    -> StoreResult<StoredEntry>;

    /// Looks up one row by its identity.
    fn find_by_id(&self, id: u64) -> StoreResult<Option<StoredEntry>>;

    /// Returns one page of a chat's rows, in insertion order.
    fn find_page(
        &self,
        owner_id: &str,
        chat_key: &str,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<StoredEntry>>;

    /// Deletes a row by its identity. Deleting a missing row is not an error.
    fn delete_by_id(&mut self, id: u64) -> StoreResult<()>;

    /// Returns `true` if the chat key has any stored rows for the owner.
    fn exists_by_owner_and_chat_key(&self, owner_id: &str, chat_key: &str) -> StoreResult<bool>;

    /// Returns the distinct chat keys stored for the owner.
    fn chat_keys_by_owner(&self, owner_id: &str) -> StoreResult<Vec<String>>;

    /// Drains every page of a chat's rows.
    fn find_by_owner_and_chat_key(
        &self,
        owner_id: &str,
        chat_key: &str,
    ) -> StoreResult<Vec<StoredEntry>> {
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.find_page(owner_id, chat_key, offset, DEFAULT_PAGE_SIZE)?;
            let fetched = page.len();
            all.extend(page);
            if fetched < DEFAULT_PAGE_SIZE {
                return Ok(all);
            }
            offset += fetched;
        }
    }
}

/// Content-addressed persistence contract for attachments.
pub trait AttachmentStore {
    /// Records a new object for the hash, or refreshes `last_seen` on the
    /// existing one.
    fn upsert_object(&mut self, content_hash: &str) -> StoreResult<AttachmentObject>;

    /// Records or refreshes the (filename, owner) → hash mapping.
    fn upsert_location(
        &mut self,
        filename: &str,
        owner_id: &str,
        content_hash: &str,
    ) -> StoreResult<AttachmentLocation>;

    /// Looks up an object by its content hash.
    fn find_object_by_hash(&self, content_hash: &str) -> StoreResult<Option<AttachmentObject>>;

    /// Returns every location recorded for the owner.
    fn find_locations_by_owner(&self, owner_id: &str) -> StoreResult<Vec<AttachmentLocation>>;
}
