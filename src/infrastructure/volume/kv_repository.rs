//! KV-backed volume repository

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::kv::KvStore;
use crate::domain::volume::{
    codec, key_for, scope_query, validate_name, Volume, VolumeRepository,
};
use crate::domain::DomainError;

/// Volume repository storing one JSON record per volume in a KV store
#[derive(Clone)]
pub struct KvVolumeRepository {
    store: Arc<dyn KvStore>,
    timeout: Option<Duration>,
}

impl fmt::Debug for KvVolumeRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvVolumeRepository")
            .field("store", &self.store.backend_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl KvVolumeRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bounds every store call; an expired call fails with `StoreUnavailable`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(DomainError::store_unavailable(format!(
                    "{} timed out after {:?}",
                    op, limit
                ))),
            },
            None => call.await,
        };

        result.inspect_err(|e| {
            error!(op = op, backend = self.store.backend_name(), error = %e, "Store call failed");
        })
    }
}

#[async_trait]
impl VolumeRepository for KvVolumeRepository {
    async fn set_volume(&self, volume: &Volume) -> Result<(), DomainError> {
        debug!(op = "set_volume", volume = ?volume, "Storing volume");

        if volume.name.is_empty() {
            error!(op = "set_volume", "Refusing to store volume without a name");
            return Err(DomainError::validation("Volume name must not be empty"));
        }
        validate_name(&volume.name)?;

        let data = codec::encode(volume).inspect_err(|e| {
            error!(op = "set_volume", volume = %volume.name, error = %e, "Failed to encode volume");
        })?;

        let key = key_for(&volume.name);
        self.bounded("set_volume", self.store.put(&key, &data)).await
    }

    async fn get_volume(&self, name: &str) -> Result<Volume, DomainError> {
        debug!(op = "get_volume", volume = %name, "Loading volume");
        validate_name(name)?;

        let key = key_for(name);
        let Some(pair) = self.bounded("get_volume", self.store.get(&key)).await? else {
            debug!(op = "get_volume", volume = %name, "Volume not found");
            return Ok(Volume::default());
        };

        debug!(
            op = "get_volume",
            key = %pair.key,
            value = %String::from_utf8_lossy(&pair.value),
            "Fetched entry"
        );

        codec::decode(&pair.value).inspect_err(|e| {
            error!(op = "get_volume", key = %pair.key, error = %e, "Failed to decode volume");
        })
    }

    async fn get_volumes(&self) -> Result<HashMap<String, Volume>, DomainError> {
        debug!(op = "get_volumes", "Listing volumes");

        let prefix = scope_query();
        let pairs = self.bounded("get_volumes", self.store.list(&prefix)).await?;

        let mut volumes = HashMap::with_capacity(pairs.len());

        // One bad entry fails the whole listing
        for pair in pairs {
            let volume = codec::decode(&pair.value).inspect_err(|e| {
                error!(op = "get_volumes", key = %pair.key, error = %e, "Failed to decode volume");
            })?;
            volumes.insert(volume.name.clone(), volume);
        }

        debug!(op = "get_volumes", count = volumes.len(), "Listed volumes");
        Ok(volumes)
    }

    async fn delete_volume(&self, name: &str) -> Result<(), DomainError> {
        debug!(op = "delete_volume", volume = %name, "Deleting volume");
        validate_name(name)?;

        let key = key_for(name);
        self.bounded("delete_volume", self.store.delete(&key)).await
    }
}
