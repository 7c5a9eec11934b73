//! In-memory KV store implementation

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::kv::{KvPair, KvStore};
use crate::domain::DomainError;

/// Thread-safe in-memory KV store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKvStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries
    pub fn with_entries(entries: Vec<KvPair>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().map(|p| (p.key, p.value)).collect()),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<KvPair>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(key).map(|value| KvPair::new(key, value.clone())))
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvPair>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KvPair::new(key.clone(), value.clone()))
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
