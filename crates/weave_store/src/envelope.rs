//! Versioned, checksummed wrapper around a stored descriptor.
//!
//! The checksum covers the canonical JSON form of the payload (object keys
//! sorted), so reformatting a file by hand is tolerated while any change to
//! a value is not.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use weave_common::ContentHash;

use crate::error::StoreError;

/// Current descriptor file format version.
pub const FORMAT_VERSION: u32 = 1;

/// A descriptor together with the metadata needed to validate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Descriptor file format version.
    pub format_version: u32,
    /// Version of the tool that wrote the file.
    pub tool_version: String,
    /// XXH3 checksum of the canonical payload.
    pub checksum: ContentHash,
    /// The descriptor itself.
    pub payload: serde_json::Value,
}

fn canonical_hash(payload: &serde_json::Value) -> Result<ContentHash, serde_json::Error> {
    Ok(ContentHash::from_bytes(&serde_json::to_vec(payload)?))
}

impl Envelope {
    /// Wraps `descriptor` for writing.
    pub fn seal<T: Serialize>(descriptor: &T) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_value(descriptor)?;
        Ok(Self {
            format_version: FORMAT_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            checksum: canonical_hash(&payload)?,
            payload,
        })
    }

    /// Validates the envelope read from `path` and decodes its payload.
    pub fn open<T: DeserializeOwned>(self, path: &Path) -> Result<T, StoreError> {
        let malformed = |e: serde_json::Error| StoreError::Serialization {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if self.format_version != FORMAT_VERSION {
            return Err(StoreError::VersionMismatch {
                path: path.to_path_buf(),
                expected: FORMAT_VERSION,
                actual: self.format_version,
            });
        }
        let actual = canonical_hash(&self.payload).map_err(malformed)?;
        if actual != self.checksum {
            return Err(StoreError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: self.checksum.to_string(),
                actual: actual.to_string(),
            });
        }
        serde_json::from_value(self.payload).map_err(malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> BTreeMap<String, f64> {
        BTreeMap::from([("area".to_string(), 25_000.5), ("aspect_ratio".to_string(), 1.0)])
    }

    #[test]
    fn sealed_envelope_opens() {
        let env = Envelope::seal(&sample()).unwrap();
        assert_eq!(env.format_version, FORMAT_VERSION);
        let text = serde_json::to_string_pretty(&env).unwrap();
        let back: Envelope = serde_json::from_str(&text).unwrap();
        let decoded: BTreeMap<String, f64> = back.open(Path::new("x.json")).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn edited_payload_fails_checksum() {
        let mut env = Envelope::seal(&sample()).unwrap();
        env.payload["area"] = serde_json::json!(1.0);
        let err = env.open::<BTreeMap<String, f64>>(Path::new("x.json")).unwrap_err();
        assert!(matches!(err, StoreError::ChecksumMismatch { .. }));
    }

    #[test]
    fn future_format_is_rejected() {
        let mut env = Envelope::seal(&sample()).unwrap();
        env.format_version = FORMAT_VERSION + 1;
        let err = env.open::<BTreeMap<String, f64>>(Path::new("x.json")).unwrap_err();
        assert!(matches!(err, StoreError::VersionMismatch { actual: 2, .. }));
    }
}
