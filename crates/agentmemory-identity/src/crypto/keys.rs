//! Ed25519 key pairs.
//!
//! Secret keys travel in the 64-byte keypair layout (`seed || public`).
//! A bare 32-byte seed is also accepted on import.

use ed25519_dalek::{SigningKey, VerifyingKey, KEYPAIR_LENGTH, SECRET_KEY_LENGTH};

use crate::error::{IdentityError, Result};

/// Length of an exported secret key in bytes.
pub const SECRET_KEYPAIR_LENGTH: usize = KEYPAIR_LENGTH;

/// An Ed25519 key pair for signing operations.
///
/// `SigningKey` zeroizes its secret scalar on drop, so clones handed out
/// by the key store do not linger in memory.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct a key pair from secret key bytes.
    ///
    /// Accepts either the 64-byte keypair layout, whose public half must
    /// match the one derived from the seed, or a 32-byte seed.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let signing_key = match bytes.len() {
            KEYPAIR_LENGTH => {
                let mut keypair = [0u8; KEYPAIR_LENGTH];
                keypair.copy_from_slice(bytes);
                let parsed = SigningKey::from_keypair_bytes(&keypair);
                zeroize::Zeroize::zeroize(&mut keypair);
                parsed.map_err(|_| {
                    IdentityError::InvalidKey("public half does not match secret seed".into())
                })?
            }
            SECRET_KEY_LENGTH => {
                let mut seed = [0u8; SECRET_KEY_LENGTH];
                seed.copy_from_slice(bytes);
                let key = SigningKey::from_bytes(&seed);
                zeroize::Zeroize::zeroize(&mut seed);
                key
            }
            other => {
                return Err(IdentityError::InvalidKey(format!(
                    "secret key must be {KEYPAIR_LENGTH} or {SECRET_KEY_LENGTH} bytes, got {other}"
                )))
            }
        };
        let verifying_key = signing_key.verifying_key();
        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// Reconstruct a verifying key from raw bytes.
    pub fn verifying_key_from_bytes(bytes: &[u8; 32]) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(bytes)
            .map_err(|e| IdentityError::InvalidKey(format!("invalid verifying key: {e}")))
    }

    /// Return a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Return the verifying (public) key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Return the 64-byte secret keypair. Caller must zeroize after use.
    pub fn secret_keypair_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    /// Return the verifying key bytes.
    pub fn verifying_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("verifying_key", &hex::encode(self.verifying_key_bytes()))
            .finish_non_exhaustive()
    }
}
