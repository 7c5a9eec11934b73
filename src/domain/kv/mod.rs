//! Key-value domain - Store abstraction the volume repository is built on

mod store;

pub use store::{KvPair, KvStore};

#[cfg(test)]
pub use store::MockKvStore;
