//! Volume repository trait

use std::collections::HashMap;

use async_trait::async_trait;

use super::Volume;
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for volume metadata persistence
///
/// Every call is independent. Concurrent writers of the same name race with
/// last-writer-wins; callers serialize lifecycle operations per volume.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VolumeRepository: Send + Sync {
    /// Stores a volume, overwriting any previous record with the same name
    async fn set_volume(&self, volume: &Volume) -> Result<(), DomainError>;

    /// Loads a volume; returns the empty sentinel (see `Volume::is_empty`) when absent
    async fn get_volume(&self, name: &str) -> Result<Volume, DomainError>;

    /// Loads every stored volume keyed by name
    async fn get_volumes(&self) -> Result<HashMap<String, Volume>, DomainError>;

    /// Removes a volume; removing an absent volume succeeds
    async fn delete_volume(&self, name: &str) -> Result<(), DomainError>;
}
