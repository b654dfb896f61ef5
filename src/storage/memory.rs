use async_trait::async_trait;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use super::{KeyValueStore, StorageError};

/// In-process backend. Values are stored as serialized JSON so one store
/// can hold heterogeneous snapshot entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        if let Some(value) = self.entries.get(key) {
            Ok(Some(serde_json::from_str(value.value())?))
        } else {
            Ok(None)
        }
    }

    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.entries.insert(key.to_string(), json);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_del_roundtrip() {
        let store = MemoryStore::new();

        store.set("k", &42u32).await.unwrap();
        assert_eq!(store.get::<u32>("k").await.unwrap(), Some(42));

        store.del("k").await.unwrap();
        assert_eq!(store.get::<u32>("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get::<String>("nope").await.unwrap(), None);
    }
}
