//! The public persona of an agent.

use serde::{Deserialize, Serialize};

use crate::crypto::random::random_bytes;
use crate::error::{IdentityError, Result};

/// Unique identifier for an identity.
///
/// Format: `aid_` + base58 of 16 random bytes. The id is assigned once and
/// is independent of key material, so it survives key rotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub String);

impl IdentityId {
    /// Draw a fresh identifier from the CSPRNG.
    pub fn generate() -> Self {
        let bytes: [u8; 16] = random_bytes();
        Self(format!("aid_{}", bs58::encode(bytes).into_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for IdentityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A public key that was active before a rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetiredKey {
    pub key_version: u32,
    #[serde(with = "crate::encoding::base64_array")]
    pub public_key: [u8; 32],
    pub retired_at: u64,
}

/// An agent's public identity. Never carries secret key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentIdentity {
    pub id: IdentityId,
    pub name: String,
    /// Current Ed25519 public key.
    #[serde(with = "crate::encoding::base64_array")]
    pub signing_public_key: [u8; 32],
    /// Starts at 1, incremented once per rotation.
    pub key_version: u32,
    /// Creation timestamp (microseconds since Unix epoch).
    pub created_at: u64,
    /// Keys retired by rotation, oldest first.
    #[serde(default)]
    pub previous_keys: Vec<RetiredKey>,
}

impl AgentIdentity {
    pub(crate) fn new(name: impl Into<String>, public_key: [u8; 32], created_at: u64) -> Self {
        Self {
            id: IdentityId::generate(),
            name: name.into(),
            signing_public_key: public_key,
            key_version: 1,
            created_at,
            previous_keys: Vec::new(),
        }
    }

    /// The public key that was active at `key_version`, if this identity
    /// has held that version.
    pub fn key_for_version(&self, key_version: u32) -> Option<[u8; 32]> {
        if key_version == self.key_version {
            return Some(self.signing_public_key);
        }
        self.previous_keys
            .iter()
            .find(|k| k.key_version == key_version)
            .map(|k| k.public_key)
    }

    /// Current public key as base64.
    pub fn public_key_base64(&self) -> String {
        crate::encoding::to_base64(self.signing_public_key)
    }

    /// Retire the current key and install `public_key` as the next version.
    ///
    /// Fails without touching the identity once the version counter is
    /// exhausted.
    pub(crate) fn advance_key(&mut self, public_key: [u8; 32], rotated_at: u64) -> Result<()> {
        let next_version = self.key_version.checked_add(1).ok_or_else(|| {
            IdentityError::InvalidKey(format!(
                "key version {} of {} cannot advance",
                self.key_version, self.id
            ))
        })?;
        self.previous_keys.push(RetiredKey {
            key_version: self.key_version,
            public_key: self.signing_public_key,
            retired_at: rotated_at,
        });
        self.signing_public_key = public_key;
        self.key_version = next_version;
        Ok(())
    }
}
