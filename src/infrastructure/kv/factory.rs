//! KV store factory for runtime backend selection

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::kv::KvStore;
use crate::domain::DomainError;

use super::consul::{ConsulConfig, ConsulKvStore};
use super::in_memory::InMemoryKvStore;

/// Supported store types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    /// Consul agent KV API
    #[default]
    Consul,
    /// In-memory store (for testing/development)
    InMemory,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Consul => write!(f, "consul"),
            StoreType::InMemory => write!(f, "in_memory"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consul" => Ok(StoreType::Consul),
            "in_memory" | "inmemory" | "in-memory" | "memory" => Ok(StoreType::InMemory),
            _ => Err(DomainError::configuration(format!(
                "Unknown store type: {}. Valid types: consul, in_memory",
                s
            ))),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Consul configuration
    Consul(ConsulConfig),
    /// In-memory store
    InMemory,
}

impl StoreConfig {
    /// Consul configuration read from the process environment
    pub fn consul_from_env() -> Self {
        Self::Consul(ConsulConfig::from_env())
    }

    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn store_type(&self) -> StoreType {
        match self {
            Self::Consul(_) => StoreType::Consul,
            Self::InMemory => StoreType::InMemory,
        }
    }
}

/// Factory producing store handles
#[derive(Debug)]
pub struct KvStoreFactory;

impl KvStoreFactory {
    /// Builds a handle for the configured backend
    ///
    /// Only client construction can fail here; store reachability is checked
    /// by the first operation.
    pub fn connect(config: &StoreConfig) -> Result<Arc<dyn KvStore>, DomainError> {
        match config {
            StoreConfig::Consul(consul) => {
                let store = ConsulKvStore::connect(consul.clone()).inspect_err(|e| {
                    error!(op = "connect", address = %consul.address, error = %e, "Failed to create store client");
                })?;
                debug!(op = "connect", address = %consul.address, "Created Consul KV client");
                Ok(Arc::new(store))
            }
            StoreConfig::InMemory => {
                debug!(op = "connect", "Created in-memory KV store");
                Ok(Arc::new(InMemoryKvStore::new()))
            }
        }
    }

    /// Builds a Consul handle from `CONSUL_ADDRESS`, defaulting to the local agent
    pub fn connect_from_env() -> Result<Arc<dyn KvStore>, DomainError> {
        Self::connect(&StoreConfig::consul_from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!("consul".parse::<StoreType>().unwrap(), StoreType::Consul);
        assert_eq!("CONSUL".parse::<StoreType>().unwrap(), StoreType::Consul);
        assert_eq!("memory".parse::<StoreType>().unwrap(), StoreType::InMemory);
        assert_eq!("in-memory".parse::<StoreType>().unwrap(), StoreType::InMemory);
        assert!("etcd".parse::<StoreType>().is_err());
    }

    #[test]
    fn test_store_type_display() {
        assert_eq!(StoreType::Consul.to_string(), "consul");
        assert_eq!(StoreType::InMemory.to_string(), "in_memory");
    }

    #[test]
    fn test_connect_backends() {
        let store = KvStoreFactory::connect(&StoreConfig::in_memory()).unwrap();
        assert_eq!(store.backend_name(), "in_memory");

        let config = StoreConfig::Consul(ConsulConfig::new("localhost:8500"));
        assert_eq!(config.store_type(), StoreType::Consul);

        let store = KvStoreFactory::connect(&config).unwrap();
        assert_eq!(store.backend_name(), "consul");
    }

    #[test]
    fn test_connect_from_env() {
        let store = KvStoreFactory::connect_from_env().unwrap();
        assert_eq!(store.backend_name(), "consul");
    }

    #[test]
    fn test_connect_rejects_malformed_address() {
        let config = StoreConfig::Consul(ConsulConfig::new("::not a url::"));
        let result = KvStoreFactory::connect(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
