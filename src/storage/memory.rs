use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::storage::IndexStorage;

/// In-memory storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>> {
        self.data.read().map_err(|_| Error::Storage("memory storage lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>> {
        self.data.write().map_err(|_| Error::Storage("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl IndexStorage for MemoryStorage {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read()?.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.write()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn append(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.write()?.entry(key.to_string()).or_default().extend_from_slice(bytes);
        Ok(())
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> =
            self.read()?.keys().filter(|key| key.starts_with(prefix)).cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_exists() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("a").await.unwrap());
        assert_eq!(storage.get("a").await.unwrap(), None);

        storage.put("a", b"one").await.unwrap();
        assert!(storage.exists("a").await.unwrap());
        assert_eq!(storage.get("a").await.unwrap(), Some(b"one".to_vec()));
    }

    #[tokio::test]
    async fn test_append_creates_and_extends() {
        let storage = MemoryStorage::new();
        storage.append("index.jsonl", b"{}\n").await.unwrap();
        storage.append("index.jsonl", b"{}\n").await.unwrap();
        assert_eq!(storage.get("index.jsonl").await.unwrap(), Some(b"{}\n{}\n".to_vec()));
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        clone.put("k", b"v").await.unwrap();
        assert!(storage.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_prefix_sorted() {
        let storage = MemoryStorage::new();
        for key in ["graphs/b.jsonl", "graphs/a.jsonl", "other.jsonl"] {
            storage.put(key, b"").await.unwrap();
        }
        assert_eq!(
            storage.find_by_prefix("graphs/").await.unwrap(),
            vec!["graphs/a.jsonl".to_string(), "graphs/b.jsonl".to_string()]
        );
    }
}
