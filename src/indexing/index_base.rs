//! Generic persisted collection of keyed entries.
//!
//! Entries live in memory in insertion order and are persisted as an
//! append-only JSON Lines document under one storage key. Reloading replays
//! the document; a record whose id was already seen replaces the earlier one
//! in place.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::identifier::ResourceIdentifier;
use crate::error::{Error, Result};
use crate::storage::{from_json_lines, to_json_line, IndexStorage};

/// A record an [`IndexBase`] can hold.
pub trait IndexItem: Serialize + DeserializeOwned + Send + Sync {
    /// Key the entry is stored under
    fn id(&self) -> &str;

    fn identifier(&self) -> &ResourceIdentifier;

    fn set_id(&mut self, id: String);
}

/// Keys `item` by the rendering of its identifier, whatever id it carried.
fn canonicalize<T: IndexItem>(mut item: T) -> T {
    let id = item.identifier().to_string();
    if item.id() != id {
        log::debug!("Re-keying entry '{}' as '{}'", item.id(), id);
        item.set_id(id);
    }
    item
}

#[derive(Debug)]
pub struct IndexBase<T> {
    storage: Arc<dyn IndexStorage>,
    index_key: String,
    items: Vec<T>,
    positions: HashMap<String, usize>,
    loaded: bool,
}

impl<T: IndexItem> IndexBase<T> {
    pub fn new(storage: Arc<dyn IndexStorage>, index_key: impl Into<String>) -> Result<Self> {
        let index_key = index_key.into();
        if index_key.trim().is_empty() {
            return Err(Error::Config("index key must not be empty".to_string()));
        }
        Ok(Self {
            storage,
            index_key,
            items: Vec::new(),
            positions: HashMap::new(),
            loaded: false,
        })
    }

    /// Whether persisted state has been read at least once
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces the in-memory entries with the persisted ones. On failure the
    /// previous entries are kept and `loaded` is left unchanged.
    pub async fn load_data(&mut self) -> Result<()> {
        let mut items: Vec<T> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        if self.storage.exists(&self.index_key).await? {
            let content = self.storage.get(&self.index_key).await?.unwrap_or_default();
            for record in from_json_lines::<T>(&content)? {
                let record = canonicalize(record);
                match positions.get(record.id()) {
                    Some(&position) => items[position] = record,
                    None => {
                        positions.insert(record.id().to_string(), items.len());
                        items.push(record);
                    }
                }
            }
        }

        log::debug!("Loaded {} entries from '{}'", items.len(), self.index_key);
        self.items = items;
        self.positions = positions;
        self.loaded = true;
        Ok(())
    }

    /// Persists `item`, then records it in memory. Returns `true` when an
    /// entry with the same id was replaced.
    pub async fn add_item(&mut self, item: T) -> Result<bool> {
        let item = canonicalize(item);
        let line = to_json_line(&item)?;
        if let Err(e) = self.storage.append(&self.index_key, line.as_bytes()).await {
            log::error!("Failed to persist entry '{}': {}", item.id(), e);
            return Err(e);
        }

        match self.positions.get(item.id()) {
            Some(&position) => {
                self.items[position] = item;
                Ok(true)
            }
            None => {
                self.positions.insert(item.id().to_string(), self.items.len());
                self.items.push(item);
                Ok(false)
            }
        }
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn get_item(&self, id: &str) -> Option<&T> {
        self.positions.get(id).map(|&position| &self.items[position])
    }

    /// Entries in insertion order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage(&self) -> &Arc<dyn IndexStorage> {
        &self.storage
    }

    pub fn index_key(&self) -> &str {
        &self.index_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        identifier: ResourceIdentifier,
        body: String,
    }

    impl Note {
        fn new(name: &str, body: &str) -> Self {
            let identifier = ResourceIdentifier::new("common.Note", name);
            Self { id: identifier.to_string(), identifier, body: body.to_string() }
        }
    }

    impl IndexItem for Note {
        fn id(&self) -> &str {
            &self.id
        }

        fn identifier(&self) -> &ResourceIdentifier {
            &self.identifier
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    fn base(storage: &MemoryStorage) -> IndexBase<Note> {
        IndexBase::new(Arc::new(storage.clone()), "index.jsonl").unwrap()
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = IndexBase::<Note>::new(Arc::new(MemoryStorage::new()), "  ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_add_then_reload() {
        let storage = MemoryStorage::new();
        let mut index = base(&storage);
        assert!(!index.add_item(Note::new("a", "first")).await.unwrap());
        assert!(!index.add_item(Note::new("b", "second")).await.unwrap());

        let mut reloaded = base(&storage);
        assert!(!reloaded.loaded());
        reloaded.load_data().await.unwrap();
        assert!(reloaded.loaded());
        assert_eq!(reloaded.items(), index.items());
        assert!(reloaded.has_item("common.Note.a"));
        assert_eq!(reloaded.get_item("common.Note.b").unwrap().body, "second");
    }

    #[tokio::test]
    async fn test_replace_keeps_position_and_reload_agrees() {
        let storage = MemoryStorage::new();
        let mut index = base(&storage);
        index.add_item(Note::new("a", "first")).await.unwrap();
        index.add_item(Note::new("b", "second")).await.unwrap();
        assert!(index.add_item(Note::new("a", "updated")).await.unwrap());

        assert_eq!(index.len(), 2);
        assert_eq!(index.items()[0].body, "updated");

        let mut reloaded = base(&storage);
        reloaded.load_data().await.unwrap();
        assert_eq!(reloaded.items(), index.items());
    }

    #[tokio::test]
    async fn test_load_without_persisted_state() {
        let mut index = base(&MemoryStorage::new());
        index.load_data().await.unwrap();
        assert!(index.loaded());
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_record_fails_load() {
        let storage = MemoryStorage::new();
        storage.put("index.jsonl", b"{not json}\n").await.unwrap();
        let mut index = base(&storage);
        assert!(matches!(index.load_data().await, Err(Error::Serialization(_))));
        assert!(!index.loaded());
    }

    #[derive(Debug)]
    struct ReadOnlyStorage;

    #[async_trait::async_trait]
    impl IndexStorage for ReadOnlyStorage {
        async fn exists(&self, _key: &str) -> Result<bool> {
            Ok(false)
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn put(&self, key: &str, _bytes: &[u8]) -> Result<()> {
            Err(Error::Storage(format!("{} is read-only", key)))
        }

        async fn append(&self, key: &str, _bytes: &[u8]) -> Result<()> {
            Err(Error::Storage(format!("{} is read-only", key)))
        }

        async fn find_by_prefix(&self, _prefix: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failed_append_leaves_memory_unchanged() {
        let mut index = IndexBase::<Note>::new(Arc::new(ReadOnlyStorage), "index.jsonl").unwrap();
        index.load_data().await.unwrap();

        let result = index.add_item(Note::new("a", "first")).await;
        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(index.is_empty());
        assert!(!index.has_item("common.Note.a"));
    }

    #[tokio::test]
    async fn test_persisted_id_is_rekeyed_by_identifier() {
        let storage = MemoryStorage::new();
        let record = r#"{"id":"cld:common.Note.a","identifier":{"type":"common.Note","name":"a"},"body":"first"}"#;
        storage.put("index.jsonl", format!("{}\n", record).as_bytes()).await.unwrap();

        let mut index = base(&storage);
        index.load_data().await.unwrap();
        assert!(index.has_item("common.Note.a"));
        assert!(!index.has_item("cld:common.Note.a"));
        assert_eq!(index.items()[0].id, "common.Note.a");

        assert!(index.add_item(Note::new("a", "updated")).await.unwrap());
        assert_eq!(index.len(), 1);
        assert_eq!(index.items()[0].body, "updated");
    }

    #[tokio::test]
    async fn test_added_item_with_stale_id_is_rekeyed() {
        let storage = MemoryStorage::new();
        let mut index = base(&storage);
        let mut note = Note::new("a", "first");
        note.id = "stale".to_string();

        index.add_item(note).await.unwrap();
        assert!(index.has_item("common.Note.a"));
        assert!(!index.has_item("stale"));
    }
}
