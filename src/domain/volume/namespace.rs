//! Store key namespace for volume records

use crate::domain::DomainError;

/// Prefix shared by every volume key
pub const KEY_PREFIX: &str = "docker/volume/rbd/";

/// Store key for a volume name
pub fn key_for(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

/// Prefix query matching every volume key
pub fn scope_query() -> String {
    key_for("")
}

/// True when a `/`-separated key has a `.` or `..` segment
///
/// Such keys do not survive URL path normalization unchanged.
pub fn has_dot_segment(key: &str) -> bool {
    key.split('/').any(|segment| segment == "." || segment == "..")
}

/// Rejects names whose store key would not map one-to-one onto the wire
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if has_dot_segment(name) {
        return Err(DomainError::validation(format!(
            "Volume name '{}' must not contain '.' or '..' path segments",
            name
        )));
    }

    Ok(())
}
