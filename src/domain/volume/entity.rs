//! Volume descriptor entity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted description of one managed RBD volume
///
/// Field names are serialized in PascalCase so entries written by earlier
/// versions of the driver decode unchanged. Fields this version does not know
/// about are kept in `extra` and written back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Volume {
    /// Unique volume name, empty only for the not-found sentinel
    pub name: String,
    /// Ceph pool holding the image
    pub pool: String,
    /// RBD image name inside the pool
    pub image: String,
    /// Mapped block device path, e.g. `/dev/rbd0`
    pub device: String,
    /// Host currently holding the image lock
    pub locker: String,
    /// Mount path on the host
    pub mountpoint: String,
    /// Filesystem type created on the image
    pub fstype: String,
    /// Provisioned image size in MiB, zero when unknown
    pub size_mb: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Volume {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = pool.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_locker(mut self, locker: impl Into<String>) -> Self {
        self.locker = locker.into();
        self
    }

    pub fn with_mountpoint(mut self, mountpoint: impl Into<String>) -> Self {
        self.mountpoint = mountpoint.into();
        self
    }

    pub fn with_fstype(mut self, fstype: impl Into<String>) -> Self {
        self.fstype = fstype.into();
        self
    }

    pub fn with_size_mb(mut self, size_mb: u64) -> Self {
        self.size_mb = size_mb;
        self
    }

    /// True for the sentinel returned when a lookup finds nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let volume = Volume::new("vol1")
            .with_pool("rbd")
            .with_image("img1")
            .with_device("/dev/rbd0");

        assert_eq!(volume.name, "vol1");
        assert_eq!(volume.pool, "rbd");
        assert_eq!(volume.image, "img1");
        assert_eq!(volume.device, "/dev/rbd0");
        assert!(volume.locker.is_empty());
        assert!(!volume.is_empty());
    }

    #[test]
    fn test_default_is_sentinel() {
        assert!(Volume::default().is_empty());
    }

    #[test]
    fn test_serializes_pascal_case() {
        let volume = Volume::new("vol1").with_pool("rbd");
        let json = serde_json::to_value(&volume).unwrap();

        assert_eq!(json["Name"], "vol1");
        assert_eq!(json["Pool"], "rbd");
        assert_eq!(json["Mountpoint"], "");
        assert_eq!(json["SizeMb"], 0);
    }

    #[test]
    fn test_size_mb_round_trip() {
        let volume = Volume::new("vol1").with_size_mb(10240);

        let json = serde_json::to_string(&volume).unwrap();
        assert!(json.contains(r#""SizeMb":10240"#));

        let decoded: Volume = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.size_mb, 10240);
        assert!(decoded.extra.is_empty());
        assert_eq!(decoded, volume);
    }
}
