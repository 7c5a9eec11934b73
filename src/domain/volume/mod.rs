//! Volume domain module
//!
//! A volume record is stored as JSON under `docker/volume/rbd/<name>`.

pub mod codec;
mod entity;
pub mod namespace;
mod repository;

pub use entity::Volume;
pub use namespace::{key_for, scope_query, validate_name, KEY_PREFIX};
pub use repository::VolumeRepository;

#[cfg(test)]
pub use repository::MockVolumeRepository;
