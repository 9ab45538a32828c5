//! Session registry.
//!
//! Counter updates happen under the write lock, so concurrent successful
//! verifications on one session never lose an increment.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::crypto::random::random_bytes;
use crate::error::{IdentityError, Result};
use crate::identity::{AgentIdentity, IdentityId};

use super::state::CrossSessionState;

/// Tracks every open cross-session context.
#[derive(Debug, Default)]
pub struct SessionTracker {
    sessions: RwLock<HashMap<String, CrossSessionState>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session bound to `identity`.
    ///
    /// Without a caller-chosen id one is generated. Reusing a live id
    /// fails with `SessionExists`.
    pub fn open(
        &self,
        identity: AgentIdentity,
        session_id: Option<String>,
        now: u64,
    ) -> Result<CrossSessionState> {
        let session_id = session_id.unwrap_or_else(|| generate_session_id(now));
        let mut sessions = self.write();
        if sessions.contains_key(&session_id) {
            return Err(IdentityError::SessionExists(session_id));
        }
        let state = CrossSessionState::new(session_id.clone(), identity, now);
        sessions.insert(session_id, state.clone());
        log::info!(
            "opened session {} for identity {}",
            state.session_id,
            state.agent_identity.id
        );
        Ok(state)
    }

    /// The agent a session is bound to.
    pub fn bound_agent(&self, session_id: &str) -> Result<IdentityId> {
        self.read()
            .get(session_id)
            .map(|s| s.agent_identity.id.clone())
            .ok_or_else(|| IdentityError::SessionNotFound(session_id.to_string()))
    }

    /// Count one successful verification by `agent` and re-evaluate trust.
    ///
    /// The binding is re-checked under the same write lock as the
    /// increment. Returns `None`, counting nothing, if the session is now
    /// bound to a different agent.
    pub fn record_verified(
        &self,
        session_id: &str,
        agent: &IdentityId,
        trust_threshold: u32,
        now: u64,
    ) -> Result<Option<CrossSessionState>> {
        let mut sessions = self.write();
        let state = sessions
            .get_mut(session_id)
            .ok_or_else(|| IdentityError::SessionNotFound(session_id.to_string()))?;
        if state.agent_identity.id != *agent {
            return Ok(None);
        }
        if state.record_success(trust_threshold, now) {
            log::info!(
                "trust established in session {session_id} after {} verified memories",
                state.verified_memories
            );
        }
        Ok(Some(state.clone()))
    }

    pub fn get(&self, session_id: &str) -> Option<CrossSessionState> {
        self.read().get(session_id).cloned()
    }

    /// False for unknown sessions.
    pub fn is_trusted(&self, session_id: &str) -> bool {
        self.read()
            .get(session_id)
            .is_some_and(|s| s.trust_established)
    }

    /// Drop a session. Returns whether it existed.
    pub fn end(&self, session_id: &str) -> bool {
        let removed = self.write().remove(session_id).is_some();
        if removed {
            log::info!("ended session {session_id}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CrossSessionState>> {
        self.sessions.read().unwrap_or_else(|poisoned| {
            log::warn!("session registry lock poisoned; continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CrossSessionState>> {
        self.sessions.write().unwrap_or_else(|poisoned| {
            log::warn!("session registry lock poisoned; continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }
}

/// `session_<micros>_<16 hex chars>`.
fn generate_session_id(now: u64) -> String {
    let suffix: [u8; 8] = random_bytes();
    format!("session_{now}_{}", hex::encode(suffix))
}
