//! KV infrastructure - Store implementations

mod consul;
mod factory;
mod in_memory;

pub use consul::{
    ConsulConfig, ConsulKvStore, CONSUL_ADDRESS_ENV, CONSUL_SSL_ENV, CONSUL_TOKEN_ENV,
    DEFAULT_CONSUL_ADDRESS,
};
pub use factory::{KvStoreFactory, StoreConfig, StoreType};
pub use in_memory::InMemoryKvStore;
