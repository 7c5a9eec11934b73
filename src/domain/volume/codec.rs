//! JSON codec for volume records

use super::Volume;
use crate::domain::DomainError;

/// Serializes a volume into the stored payload
pub fn encode(volume: &Volume) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec(volume).map_err(|e| {
        DomainError::encoding(format!("Failed to encode volume '{}': {}", volume.name, e))
    })
}

/// Deserializes a stored payload
pub fn decode(data: &[u8]) -> Result<Volume, DomainError> {
    serde_json::from_slice(data)
        .map_err(|e| DomainError::decoding(format!("Failed to decode volume: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let volume = Volume::new("vol1")
            .with_pool("rbd")
            .with_image("img1")
            .with_device("/dev/rbd3")
            .with_locker("host-a")
            .with_mountpoint("/var/lib/docker-volumes/rbd/vol1")
            .with_fstype("xfs");

        let decoded = decode(&encode(&volume).unwrap()).unwrap();
        assert_eq!(decoded, volume);
    }

    #[test]
    fn test_decodes_legacy_entry() {
        let data = br#"{"Name":"vol1","Device":"/dev/rbd0","Locker":"host-a","Mountpoint":"/mnt/vol1"}"#;

        let volume = decode(data).unwrap();
        assert_eq!(volume.name, "vol1");
        assert_eq!(volume.device, "/dev/rbd0");
        assert_eq!(volume.locker, "host-a");
        assert!(volume.pool.is_empty());
        assert!(volume.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let data = br#"{"Name":"vol1","Pool":"rbd","Size":1024,"Options":{"order":"22"}}"#;

        let volume = decode(data).unwrap();
        assert_eq!(volume.extra.get("Size"), Some(&serde_json::json!(1024)));

        let value: serde_json::Value = serde_json::from_slice(&encode(&volume).unwrap()).unwrap();
        assert_eq!(value["Size"], 1024);
        assert_eq!(value["Options"]["order"], "22");
        assert_eq!(value["Pool"], "rbd");
    }

    #[test]
    fn test_decode_malformed() {
        let result = decode(b"not json");
        assert!(matches!(result, Err(DomainError::Decoding { .. })));
    }

    #[test]
    fn test_decode_wrong_shape() {
        let result = decode(br#"["vol1"]"#);
        assert!(matches!(result, Err(DomainError::Decoding { .. })));
    }
}
