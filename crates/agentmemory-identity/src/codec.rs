//! Lossless string form of a [`SignedMemory`].
//!
//! JSON with camelCase keys; signature and public key bytes as standard
//! base64. Content itself never travels, only its hash and size.

use crate::error::{IdentityError, Result};
use crate::memory::SignedMemory;

pub fn serialize_signed_memory(record: &SignedMemory) -> Result<String> {
    serde_json::to_string(record).map_err(|e| IdentityError::SerializationError(e.to_string()))
}

pub fn deserialize_signed_memory(data: &str) -> Result<SignedMemory> {
    serde_json::from_str(data).map_err(|e| IdentityError::SerializationError(e.to_string()))
}
