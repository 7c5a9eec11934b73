//! Key-value store trait definition

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A single entry returned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvPair {
    pub key: String,
    pub value: Vec<u8>,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Flat key namespace with prefix-scoped listing
///
/// Implementations must offer linearizable single-key operations. There is no
/// multi-key transaction support.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetches a key, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<KvPair>, DomainError>;

    /// Writes a key unconditionally
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), DomainError>;

    /// Deletes a key; deleting an absent key succeeds
    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Lists every entry whose key starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<KvPair>, DomainError>;

    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_kv_store() {
        let mut mock = MockKvStore::new();

        mock.expect_get()
            .returning(|key| Ok(Some(KvPair::new(key, b"{}".to_vec()))));

        let pair = mock.get("a/b").await.unwrap().unwrap();
        assert_eq!(pair.key, "a/b");
        assert_eq!(pair.value, b"{}");
    }
}
