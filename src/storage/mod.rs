mod error;
mod memory;
mod redis;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Durable key/value access. Writes are full-overwrite; the last writer
/// wins if multiple processes share one backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError>;
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError>;
    async fn del(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct StorageManager {
    memory: Option<MemoryStore>,
    redis: Option<RedisStore>,
}

impl StorageManager {
    pub fn memory() -> Self {
        Self {
            memory: Some(MemoryStore::new()),
            redis: None,
        }
    }

    pub async fn redis(url: &str) -> Result<Self, StorageError> {
        Ok(Self {
            memory: None,
            redis: Some(RedisStore::new(url).await?),
        })
    }
}

#[async_trait]
impl KeyValueStore for StorageManager {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match (&self.redis, &self.memory) {
            (Some(redis), _) => redis.get(key).await,
            (None, Some(memory)) => memory.get(key).await,
            _ => Err(StorageError::Other("No storage backend configured".to_string())),
        }
    }

    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        match (&self.redis, &self.memory) {
            (Some(redis), _) => redis.set(key, value).await,
            (None, Some(memory)) => memory.set(key, value).await,
            _ => Err(StorageError::Other("No storage backend configured".to_string())),
        }
    }

    async fn del(&self, key: &str) -> Result<(), StorageError> {
        match (&self.redis, &self.memory) {
            (Some(redis), _) => redis.del(key).await,
            (None, Some(memory)) => memory.del(key).await,
            _ => Err(StorageError::Other("No storage backend configured".to_string())),
        }
    }
}
