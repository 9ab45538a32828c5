//! Identity lifecycle: create, import, restore, export, rotate.

use std::sync::Arc;

use zeroize::Zeroize;

use crate::crypto::keys::Ed25519KeyPair;
use crate::error::{IdentityError, Result};
use crate::time::{micros_to_rfc3339, Clock};

use super::agent::{AgentIdentity, IdentityId};
use super::backup::IdentityExport;
use super::store::{IdentityRecord, KeyStore};

/// Generates, stores, exports and rotates per-identity signing keys.
#[derive(Clone)]
pub struct KeyManager {
    store: Arc<dyn KeyStore>,
    clock: Arc<dyn Clock>,
}

impl KeyManager {
    pub fn new(store: Arc<dyn KeyStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create a new identity with a fresh key pair.
    ///
    /// Only fails if an injected store refuses the record.
    pub fn create_identity(&self, name: &str) -> Result<AgentIdentity> {
        let key_pair = Ed25519KeyPair::generate();
        let now = self.clock.now_micros();
        let identity = AgentIdentity::new(name, key_pair.verifying_key_bytes(), now);
        let created = self
            .store
            .insert_if(IdentityRecord { identity, key_pair }, &|_| Ok(()))?;
        log::info!(
            "created identity {} ({name}) at {}",
            created.id,
            micros_to_rfc3339(now)
        );
        Ok(created)
    }

    /// Import an identity from secret key bytes under a fresh id.
    ///
    /// Accepts the 64-byte keypair layout or a 32-byte seed. Use
    /// [`KeyManager::restore_identity`] to keep the original id.
    pub fn import_identity(&self, name: &str, secret_key: &[u8]) -> Result<AgentIdentity> {
        let key_pair = Ed25519KeyPair::from_secret_bytes(secret_key)?;
        let now = self.clock.now_micros();
        let identity = AgentIdentity::new(name, key_pair.verifying_key_bytes(), now);
        let imported = self
            .store
            .insert_if(IdentityRecord { identity, key_pair }, &|_| Ok(()))?;
        log::info!("imported identity {} ({name})", imported.id);
        Ok(imported)
    }

    /// Re-register an exported identity under its original id and key version.
    ///
    /// The secret key must match the exported public key. Restoring over a
    /// newer key version of the same id is refused so key versions never
    /// move backwards.
    pub fn restore_identity(&self, export: &IdentityExport) -> Result<AgentIdentity> {
        let mut secret = export.secret_key_bytes()?;
        let parsed = Ed25519KeyPair::from_secret_bytes(&secret);
        secret.zeroize();
        let key_pair = parsed?;

        let identity = export.identity.clone();
        if key_pair.verifying_key_bytes() != identity.signing_public_key {
            return Err(IdentityError::InvalidKey(
                "secret key does not match exported public key".into(),
            ));
        }
        if identity.key_version == 0 {
            return Err(IdentityError::InvalidKey("key version must start at 1".into()));
        }
        // Retired versions must climb strictly from 1 and stay below the current one.
        let mut floor = 0;
        for retired in &identity.previous_keys {
            if retired.key_version <= floor || retired.key_version >= identity.key_version {
                return Err(IdentityError::InvalidKey(format!(
                    "retired key version {} out of order for current version {}",
                    retired.key_version, identity.key_version
                )));
            }
            floor = retired.key_version;
        }

        let incoming_version = identity.key_version;
        let incoming_key = identity.signing_public_key;
        let restored = self.store.insert_if(
            IdentityRecord { identity, key_pair },
            &|existing| match existing {
                Some(current) if current.key_version > incoming_version => {
                    Err(IdentityError::InvalidKey(format!(
                        "registry already holds key version {} for {}",
                        current.key_version, current.id
                    )))
                }
                Some(current)
                    if current.key_version == incoming_version
                        && current.signing_public_key != incoming_key =>
                {
                    Err(IdentityError::InvalidKey(format!(
                        "conflicting key for version {} of {}",
                        current.key_version, current.id
                    )))
                }
                _ => Ok(()),
            },
        )?;
        log::info!(
            "restored identity {} at key version {}",
            restored.id,
            restored.key_version
        );
        Ok(restored)
    }

    /// Export an identity and its current secret key for backup.
    ///
    /// Returns `None` for unknown ids.
    pub fn export_identity(&self, id: &IdentityId) -> Option<IdentityExport> {
        let record = self.store.get(id)?;
        let mut secret = record.key_pair.secret_keypair_bytes();
        let export = IdentityExport::new(record.identity, &secret);
        secret.zeroize();
        Some(export)
    }

    /// Replace the current signing key with a fresh one.
    ///
    /// Signatures issued under earlier versions stay verifiable because
    /// each carries its own public key.
    pub fn rotate_keys(&self, id: &IdentityId) -> Result<AgentIdentity> {
        let mut next = Some(Ed25519KeyPair::generate());
        let now = self.clock.now_micros();
        let rotated = self.store.update(id, &mut |record| {
            let Some(key_pair) = next.take() else {
                return Err(IdentityError::InvalidKey("rotation key already used".into()));
            };
            record
                .identity
                .advance_key(key_pair.verifying_key_bytes(), now)?;
            record.key_pair = key_pair;
            Ok(())
        })?;
        log::info!(
            "rotated identity {} to key version {}",
            rotated.id,
            rotated.key_version
        );
        Ok(rotated)
    }

    pub fn get_identity(&self, id: &IdentityId) -> Option<AgentIdentity> {
        self.store.get(id).map(|r| r.identity)
    }

    pub fn get_all_identities(&self) -> Vec<AgentIdentity> {
        self.store.list()
    }

    /// Identity plus current key pair, for signing.
    pub(crate) fn signing_record(&self, id: &IdentityId) -> Result<IdentityRecord> {
        self.store
            .get(id)
            .ok_or_else(|| IdentityError::NotFound(id.to_string()))
    }
}
