//! Identity export bundles and passphrase-sealed backups.
//!
//! A plain [`IdentityExport`] carries the identity (including its id) and
//! the current secret key as base64, so restoring it reproduces the same
//! identity rather than a new one. [`SealedIdentity`] wraps that bundle for
//! storage outside the process:
//!
//! ```json
//! {
//!     "version": 1,
//!     "format": "amid-backup-v1",
//!     "encryption": {
//!         "algorithm": "chacha20-poly1305",
//!         "kdf": "argon2id",
//!         "salt": "<base64-16-bytes>",
//!         "nonce": "<base64-12-bytes>"
//!     },
//!     "ciphertext": "<base64>",
//!     "identity": { ... AgentIdentity ... }
//! }
//! ```

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::crypto::keys::SECRET_KEYPAIR_LENGTH;
use crate::crypto::random::random_bytes;
use crate::crypto::seal::{BackupKey, NONCE_LENGTH, SALT_LENGTH};
use crate::encoding::{array_from_base64, from_base64, to_base64};
use crate::error::{IdentityError, Result};

use super::agent::AgentIdentity;

const BACKUP_VERSION: u32 = 1;
const BACKUP_FORMAT: &str = "amid-backup-v1";
const BACKUP_ALGORITHM: &str = "chacha20-poly1305";
const BACKUP_KDF: &str = "argon2id";

/// An identity together with its current secret key.
///
/// The base64 secret is zeroized on drop.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityExport {
    pub identity: AgentIdentity,
    /// Base64 of the 64-byte Ed25519 keypair (`seed || public`).
    pub secret_key: String,
}

impl IdentityExport {
    pub(crate) fn new(identity: AgentIdentity, secret: &[u8; SECRET_KEYPAIR_LENGTH]) -> Self {
        Self {
            identity,
            secret_key: to_base64(secret),
        }
    }

    /// Decode the secret key. Caller must zeroize after use.
    pub fn secret_key_bytes(&self) -> Result<Vec<u8>> {
        from_base64(&self.secret_key).map_err(IdentityError::InvalidKey)
    }

    /// Encrypt this bundle under a passphrase.
    pub fn seal(&self, passphrase: &str) -> Result<SealedIdentity> {
        let mut plaintext = serde_json::to_vec(self)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))?;

        let salt: [u8; SALT_LENGTH] = random_bytes();
        let sealed = BackupKey::from_passphrase(passphrase.as_bytes(), &salt)
            .and_then(|key| key.seal(&plaintext));
        plaintext.zeroize();
        let (nonce, ciphertext) = sealed?;

        Ok(SealedIdentity {
            version: BACKUP_VERSION,
            format: BACKUP_FORMAT.to_string(),
            encryption: EncryptionMetadata {
                algorithm: BACKUP_ALGORITHM.to_string(),
                kdf: BACKUP_KDF.to_string(),
                salt: to_base64(salt),
                nonce: to_base64(nonce),
            },
            ciphertext: to_base64(&ciphertext),
            identity: self.identity.clone(),
        })
    }
}

impl Drop for IdentityExport {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

impl std::fmt::Debug for IdentityExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityExport")
            .field("identity", &self.identity)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Encryption parameters stored alongside the ciphertext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionMetadata {
    pub algorithm: String,
    pub kdf: String,
    /// Base64 Argon2id salt (16 bytes).
    pub salt: String,
    /// Base64 ChaCha20-Poly1305 nonce (12 bytes).
    pub nonce: String,
}

/// A passphrase-encrypted [`IdentityExport`].
///
/// The public identity is kept in the clear for inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedIdentity {
    pub version: u32,
    pub format: String,
    pub encryption: EncryptionMetadata,
    pub ciphertext: String,
    pub identity: AgentIdentity,
}

impl SealedIdentity {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| IdentityError::InvalidFileFormat(format!("failed to parse backup: {e}")))
    }

    /// Decrypt the bundle. A wrong passphrase yields `InvalidPassphrase`.
    pub fn open(&self, passphrase: &str) -> Result<IdentityExport> {
        if self.version != BACKUP_VERSION || self.format != BACKUP_FORMAT {
            return Err(IdentityError::InvalidFileFormat(format!(
                "unsupported backup version={} format={}",
                self.version, self.format,
            )));
        }

        let salt: [u8; SALT_LENGTH] = array_from_base64(&self.encryption.salt)
            .map_err(|e| IdentityError::InvalidFileFormat(format!("salt: {e}")))?;
        let nonce: [u8; NONCE_LENGTH] = array_from_base64(&self.encryption.nonce)
            .map_err(|e| IdentityError::InvalidFileFormat(format!("nonce: {e}")))?;
        let ciphertext = from_base64(&self.ciphertext)
            .map_err(|e| IdentityError::InvalidFileFormat(format!("ciphertext: {e}")))?;

        let mut plaintext =
            BackupKey::from_passphrase(passphrase.as_bytes(), &salt)?.open(&nonce, &ciphertext)?;

        let export: std::result::Result<IdentityExport, _> = serde_json::from_slice(&plaintext);
        plaintext.zeroize();
        let export = export.map_err(|e| IdentityError::SerializationError(format!("bundle: {e}")))?;

        if export.identity.id != self.identity.id {
            return Err(IdentityError::InvalidFileFormat(
                "sealed bundle does not match public identity".into(),
            ));
        }
        Ok(export)
    }
}
