//! Volume infrastructure - Repository implementations

mod kv_repository;

pub use kv_repository::KvVolumeRepository;
