//! RBD Volume Store
//!
//! Volume metadata for an RBD volume driver, kept in Consul KV so every host
//! attached to the same Ceph cluster sees one authoritative set of volumes:
//! - JSON records under `docker/volume/rbd/<name>`
//! - Set, get, list and delete with last-writer-wins semantics
//! - Consul or in-memory backends selected at runtime

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::volume::{Volume, VolumeRepository};
pub use domain::DomainError;
pub use infrastructure::kv::{KvStoreFactory, StoreConfig};
pub use infrastructure::volume::KvVolumeRepository;
