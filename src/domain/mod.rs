//! Domain layer - Volume records and the store abstraction they persist to

pub mod error;
pub mod kv;
pub mod volume;

pub use error::DomainError;
pub use kv::{KvPair, KvStore};
pub use volume::{Volume, VolumeRepository};
