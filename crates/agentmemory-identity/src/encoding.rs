//! Base64 helpers and serde adapters for raw key and signature bytes.
//!
//! Binary fields are carried as standard-alphabet base64 strings in every
//! text form this crate produces.

use base64::Engine;

/// Encode bytes as standard base64.
pub fn to_base64(bytes: impl AsRef<[u8]>) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64.
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, String> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| format!("invalid base64: {e}"))
}

/// Decode standard base64 into a fixed-length array.
pub fn array_from_base64<const N: usize>(encoded: &str) -> Result<[u8; N], String> {
    let bytes = from_base64(encoded)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| format!("expected {N} bytes, got {len}"))
}

/// `#[serde(with = "base64_array")]` for `[u8; N]` fields.
pub mod base64_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_base64(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        super::array_from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}
