use async_trait::async_trait;
use fjall::Keyspace;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tokio::task;

use crate::Result;

/// Flat key-value persistence for small blobs (the favorites list).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// On-disk store backed by a fjall keyspace
pub struct FjallStore {
    _db: fjall::Database,
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("storage", fjall::KeyspaceCreateOptions::default)?;
        tracing::debug!(path = %path.as_ref().display(), "Opened persistent store");
        Ok(FjallStore {
            _db: db,
            store: items,
        })
    }
}

#[async_trait]
impl KeyValueStore for FjallStore {
    #[tracing::instrument(name = "query_store", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();
        let value = task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;
        if value.is_none() {
            tracing::debug!("Key not found");
        }
        Ok(value)
    }

    #[tracing::instrument(name = "put_store", level = "debug", skip(self, value), fields(bytes = value.len()))]
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.insert(key, value)).await??;
        Ok(())
    }
}

/// Process-local store, used for ephemeral sessions and tests
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one raw value
    #[must_use]
    pub fn with_entry(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let entries = HashMap::from([(key.to_string(), value.into())]);
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("favoriteLocations").await.unwrap().is_none());

        store.put("favoriteLocations", b"[]".to_vec()).await.unwrap();
        assert_eq!(
            store.get("favoriteLocations").await.unwrap().as_deref(),
            Some(&b"[]"[..])
        );
    }

    #[tokio::test]
    async fn test_fjall_store_overwrites_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        store.put("favoriteLocations", b"[1]".to_vec()).await.unwrap();
        store.put("favoriteLocations", b"[1,2]".to_vec()).await.unwrap();
        assert_eq!(
            store.get("favoriteLocations").await.unwrap().as_deref(),
            Some(&b"[1,2]"[..])
        );

        assert!(store.get("missing").await.unwrap().is_none());
    }
}
