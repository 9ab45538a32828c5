//! Identity registry.
//!
//! The registry maps identity ids to their public persona and current key
//! pair. It is injected into [`super::KeyManager`] so independent cores can
//! share or isolate their identities.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::crypto::keys::Ed25519KeyPair;
use crate::error::{IdentityError, Result};

use super::agent::{AgentIdentity, IdentityId};

/// One registered identity together with its current signing key.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub identity: AgentIdentity,
    pub key_pair: Ed25519KeyPair,
}

/// Thread-safe storage for identity records.
pub trait KeyStore: Send + Sync {
    /// Insert a record after `admit` approves it against whatever is
    /// currently stored under the same id. Check and insert happen
    /// under one lock.
    fn insert_if(
        &self,
        record: IdentityRecord,
        admit: &dyn Fn(Option<&AgentIdentity>) -> Result<()>,
    ) -> Result<AgentIdentity>;

    /// Clone out a record.
    fn get(&self, id: &IdentityId) -> Option<IdentityRecord>;

    /// Mutate a record in place. Fails with `NotFound` if `id` is unknown,
    /// or with whatever `apply` returns. `apply` must not leave a partial
    /// change behind when it fails.
    fn update(
        &self,
        id: &IdentityId,
        apply: &mut dyn FnMut(&mut IdentityRecord) -> Result<()>,
    ) -> Result<AgentIdentity>;

    /// All public identities, ordered by creation time then id.
    fn list(&self) -> Vec<AgentIdentity>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory key store. Lives as long as the host process.
#[derive(Clone, Default)]
pub struct MemoryKeyStore {
    records: Arc<RwLock<HashMap<IdentityId, IdentityRecord>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<IdentityId, IdentityRecord>> {
        self.records.read().unwrap_or_else(|poisoned| {
            log::warn!("identity registry lock poisoned; continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<IdentityId, IdentityRecord>> {
        self.records.write().unwrap_or_else(|poisoned| {
            log::warn!("identity registry lock poisoned; continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl KeyStore for MemoryKeyStore {
    fn insert_if(
        &self,
        record: IdentityRecord,
        admit: &dyn Fn(Option<&AgentIdentity>) -> Result<()>,
    ) -> Result<AgentIdentity> {
        let mut records = self.write();
        let id = record.identity.id.clone();
        admit(records.get(&id).map(|r| &r.identity))?;
        let identity = record.identity.clone();
        records.insert(id, record);
        Ok(identity)
    }

    fn get(&self, id: &IdentityId) -> Option<IdentityRecord> {
        self.read().get(id).cloned()
    }

    fn update(
        &self,
        id: &IdentityId,
        apply: &mut dyn FnMut(&mut IdentityRecord) -> Result<()>,
    ) -> Result<AgentIdentity> {
        let mut records = self.write();
        let record = records
            .get_mut(id)
            .ok_or_else(|| IdentityError::NotFound(id.to_string()))?;
        apply(record)?;
        Ok(record.identity.clone())
    }

    fn list(&self) -> Vec<AgentIdentity> {
        let mut identities: Vec<AgentIdentity> =
            self.read().values().map(|r| r.identity.clone()).collect();
        identities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        identities
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}
