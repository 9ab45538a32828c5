//! Signed memory records.

use serde::{Deserialize, Serialize};

use crate::identity::IdentityId;

use super::metadata::MemoryMetadata;

/// Record layout version stamped on every new [`SignedMemory`].
pub const SIGNED_MEMORY_VERSION: u32 = 1;

/// Signature over a memory, with the signer's key snapshotted at signing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySignature {
    pub agent_id: IdentityId,
    #[serde(with = "crate::encoding::base64_array")]
    pub signature: [u8; 64],
    /// Public key of the signer at signing time. Verification uses this,
    /// never a live lookup.
    #[serde(with = "crate::encoding::base64_array")]
    pub public_key: [u8; 32],
    /// Signing time (microseconds since Unix epoch).
    pub timestamp: u64,
    pub key_version: u32,
}

/// A memory bound to an agent identity.
///
/// Content bytes are not part of the record, only their hash and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMemory {
    pub key: String,
    /// Lowercase hex SHA-256 of the content. Depends on the content only.
    pub content_hash: String,
    pub content_size: u64,
    pub metadata: MemoryMetadata,
    pub vault: String,
    pub version: u32,
    pub signature: MemorySignature,
}

/// A memory to be signed.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub key: String,
    pub content: Vec<u8>,
    pub metadata: MemoryMetadata,
    pub vault: String,
}

impl NewMemory {
    pub fn new(
        key: impl Into<String>,
        content: impl Into<Vec<u8>>,
        metadata: MemoryMetadata,
        vault: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
            metadata,
            vault: vault.into(),
        }
    }
}
