//! Infrastructure layer - External service implementations

pub mod kv;
pub mod logging;
pub mod volume;
