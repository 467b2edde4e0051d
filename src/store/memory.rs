//! In-memory storage collaborators.
//!
//! Plain `Vec`/`HashMap`-backed implementations of the storage traits. The
//! CLI runs on these, and the test suite uses them as its collaborator
//! doubles; a deployment would swap in database-backed implementations.

use std::collections::HashMap;

use chrono::Utc;

use crate::entry::ChatEntry;
use crate::store::{
    AttachmentLocation, AttachmentObject, AttachmentStore, EntryRepository, ObjectStatus,
    StoreResult, StoredEntry,
};

/// Vec-backed [`EntryRepository`].
#[derive(Debug, Default)]
pub struct MemoryEntryRepository {
    rows: Vec<StoredEntry>,
    next_id: u64,
}

impl MemoryEntryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored rows, across all owners and chats.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl EntryRepository for MemoryEntryRepository {
    fn save(
        &mut self,
        owner_id: &str,
        chat_key: &str,
        entry: ChatEntry,
    ) -> StoreResult<StoredEntry> {
        self.next_id += 1;
        let row = StoredEntry {
            id: self.next_id,
            owner_id: owner_id.to_string(),
            chat_key: chat_key.to_string(),
            entry,
        };
        self.rows.push(row.clone());
        Ok(row)
    }

    fn find_by_id(&self, id: u64) -> StoreResult<Option<StoredEntry>> {
        Ok(self.rows.iter().find(|row| row.id == id).cloned())
    }

    fn find_page(
        &self,
        owner_id: &str,
        chat_key: &str,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<StoredEntry>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.owner_id == owner_id && row.chat_key == chat_key)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn delete_by_id(&mut self, id: u64) -> StoreResult<()> {
        self.rows.retain(|row| row.id != id);
        Ok(())
    }

    fn exists_by_owner_and_chat_key(&self, owner_id: &str, chat_key: &str) -> StoreResult<bool> {
        Ok(self
            .rows
            .iter()
            .any(|row| row.owner_id == owner_id && row.chat_key == chat_key))
    }

    fn chat_keys_by_owner(&self, owner_id: &str) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = Vec::new();
        for row in &self.rows {
            if row.owner_id == owner_id && !keys.contains(&row.chat_key) {
                keys.push(row.chat_key.clone());
            }
        }
        Ok(keys)
    }
}

/// HashMap-backed [`AttachmentStore`].
#[derive(Debug, Default)]
pub struct MemoryAttachmentStore {
    objects: HashMap<String, AttachmentObject>,
    locations: HashMap<(String, String), AttachmentLocation>,
}

impl MemoryAttachmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct attachment objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of recorded locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }
}

impl AttachmentStore for MemoryAttachmentStore {
    fn upsert_object(&mut self, content_hash: &str) -> StoreResult<AttachmentObject> {
        let object = self
            .objects
            .entry(content_hash.to_string())
            .and_modify(|existing| existing.last_seen = Utc::now())
            .or_insert_with(|| AttachmentObject {
                content_hash: content_hash.to_string(),
                last_seen: Utc::now(),
                status: ObjectStatus::Active,
            });
        Ok(object.clone())
    }

    fn upsert_location(
        &mut self,
        filename: &str,
        owner_id: &str,
        content_hash: &str,
    ) -> StoreResult<AttachmentLocation> {
        let key = (filename.to_string(), owner_id.to_string());
        let location = self
            .locations
            .entry(key)
            .and_modify(|existing| {
                existing.content_hash = content_hash.to_string();
                existing.last_seen = Utc::now();
            })
            .or_insert_with(|| AttachmentLocation {
                filename: filename.to_string(),
                owner_id: owner_id.to_string(),
                content_hash: content_hash.to_string(),
                last_seen: Utc::now(),
                status: ObjectStatus::Active,
            });
        Ok(location.clone())
    }

    fn find_object_by_hash(&self, content_hash: &str) -> StoreResult<Option<AttachmentObject>> {
        Ok(self.objects.get(content_hash).cloned())
    }

    fn find_locations_by_owner(&self, owner_id: &str) -> StoreResult<Vec<AttachmentLocation>> {
        Ok(self
            .locations
            .values()
            .filter(|loc| loc.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(payload: &str) -> ChatEntry {
        ChatEntry::text("9/4/23, 7:34", "Alice", payload)
    }

    #[test]
    fn test_save_assigns_increasing_ids() {
        let mut repo = MemoryEntryRepository::new();
        let a = repo.save("owner", "chat#1", entry("a")).unwrap();
        let b = repo.save("owner", "chat#1", entry("b")).unwrap();
        assert!(b.id > a.id);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_find_is_scoped_by_owner_and_key() {
        let mut repo = MemoryEntryRepository::new();
        repo.save("owner-a", "chat#1", entry("a")).unwrap();
        repo.save("owner-b", "chat#1", entry("b")).unwrap();
        repo.save("owner-a", "chat#2", entry("c")).unwrap();

        let rows = repo.find_by_owner_and_chat_key("owner-a", "chat#1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.payload.as_deref(), Some("a"));
    }

    #[test]
    fn test_find_page_windows() {
        let mut repo = MemoryEntryRepository::new();
        for i in 0..7 {
            repo.save("owner", "chat#1", entry(&i.to_string())).unwrap();
        }
        let page = repo.find_page("owner", "chat#1", 2, 3).unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].entry.payload.as_deref(), Some("2"));
    }

    #[test]
    fn test_find_by_id() {
        let mut repo = MemoryEntryRepository::new();
        let row = repo.save("owner", "chat#1", entry("a")).unwrap();
        assert_eq!(repo.find_by_id(row.id).unwrap().unwrap().id, row.id);
        assert!(repo.find_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn test_delete_by_id() {
        let mut repo = MemoryEntryRepository::new();
        let row = repo.save("owner", "chat#1", entry("a")).unwrap();
        repo.delete_by_id(row.id).unwrap();
        assert!(repo.is_empty());
        // Deleting again is a no-op.
        repo.delete_by_id(row.id).unwrap();
    }

    #[test]
    fn test_exists() {
        let mut repo = MemoryEntryRepository::new();
        assert!(!repo.exists_by_owner_and_chat_key("owner", "chat#1").unwrap());
        repo.save("owner", "chat#1", entry("a")).unwrap();
        assert!(repo.exists_by_owner_and_chat_key("owner", "chat#1").unwrap());
    }

    #[test]
    fn test_chat_keys_by_owner_distinct() {
        let mut repo = MemoryEntryRepository::new();
        repo.save("owner", "chat#1", entry("a")).unwrap();
        repo.save("owner", "chat#1", entry("b")).unwrap();
        repo.save("owner", "chat#2", entry("c")).unwrap();

        let keys = repo.chat_keys_by_owner("owner").unwrap();
        assert_eq!(keys, vec!["chat#1".to_string(), "chat#2".to_string()]);
    }

    #[test]
    fn test_upsert_object_dedups_by_hash() {
        let mut store = MemoryAttachmentStore::new();
        let first = store.upsert_object("abc123").unwrap();
        let second = store.upsert_object("abc123").unwrap();

        assert_eq!(store.object_count(), 1);
        assert_eq!(first.content_hash, second.content_hash);
        assert!(second.last_seen >= first.last_seen);
    }

    #[test]
    fn test_upsert_location_scoped_by_filename_and_owner() {
        let mut store = MemoryAttachmentStore::new();
        store.upsert_location("a.png", "owner-1", "hash-1").unwrap();
        store.upsert_location("a.png", "owner-2", "hash-1").unwrap();
        store.upsert_location("a.png", "owner-1", "hash-1").unwrap();

        assert_eq!(store.location_count(), 2);
        assert_eq!(store.find_locations_by_owner("owner-1").unwrap().len(), 1);
    }

    #[test]
    fn test_two_locations_one_object() {
        let mut store = MemoryAttachmentStore::new();
        store.upsert_object("shared-hash").unwrap();
        store.upsert_location("a.png", "owner", "shared-hash").unwrap();
        store.upsert_location("b.png", "owner", "shared-hash").unwrap();

        assert_eq!(store.object_count(), 1);
        assert_eq!(store.location_count(), 2);
    }

    #[test]
    fn test_find_object_by_hash() {
        let mut store = MemoryAttachmentStore::new();
        assert!(store.find_object_by_hash("missing").unwrap().is_none());
        store.upsert_object("abc").unwrap();
        let found = store.find_object_by_hash("abc").unwrap().unwrap();
        assert_eq!(found.status, ObjectStatus::Active);
    }
}
