//! Passphrase sealing for identity backups.
//!
//! `passphrase --Argon2id(salt)--> master key --HKDF-SHA256--> ChaCha20-Poly1305 key`.
//! Every intermediate key lives in a [`Zeroizing`] buffer.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::crypto::random::random_bytes;
use crate::error::{IdentityError, Result};

pub const SALT_LENGTH: usize = 16;
pub const NONCE_LENGTH: usize = 12;

/// HKDF info for the sealing key. Changing it orphans existing backups.
const BACKUP_KEY_INFO: &[u8] = b"agentmemory-identity/backup-encryption";

// Argon2id: 64 MiB, 3 passes, 4 lanes.
const ARGON2_M_COST: u32 = 64 * 1024;
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

/// Symmetric key for one backup, derived from a passphrase and salt.
pub struct BackupKey(Zeroizing<[u8; 32]>);

impl BackupKey {
    pub fn from_passphrase(passphrase: &[u8], salt: &[u8; SALT_LENGTH]) -> Result<Self> {
        let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(32))
            .map_err(|e| IdentityError::DerivationFailed(format!("argon2 params: {e}")))?;

        let mut master = Zeroizing::new([0u8; 32]);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(passphrase, salt, &mut *master)
            .map_err(|e| IdentityError::DerivationFailed(format!("argon2: {e}")))?;

        let mut key = Zeroizing::new([0u8; 32]);
        Hkdf::<Sha256>::new(None, &*master)
            .expand(BACKUP_KEY_INFO, &mut *key)
            .map_err(|e| IdentityError::DerivationFailed(format!("hkdf: {e}")))?;
        Ok(Self(key))
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(&*self.0))
    }

    /// Encrypt under a fresh random nonce. Returns `(nonce, ciphertext)`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<([u8; NONCE_LENGTH], Vec<u8>)> {
        let nonce: [u8; NONCE_LENGTH] = random_bytes();
        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| IdentityError::EncryptionFailed(e.to_string()))?;
        Ok((nonce, ciphertext))
    }

    /// Decrypt and authenticate. For a well-formed backup the only way
    /// this fails is a wrong passphrase.
    pub fn open(&self, nonce: &[u8; NONCE_LENGTH], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.cipher()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| IdentityError::InvalidPassphrase)
    }
}
