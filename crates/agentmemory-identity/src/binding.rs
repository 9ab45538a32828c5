//! `IdentityBinding` — one self-contained identity binding core.
//!
//! Owns its configuration, clock, identity registry and session registry.
//! Several instances can coexist in one process without sharing state
//! unless they are handed the same [`KeyStore`].

use std::sync::Arc;

use crate::config::IdentityBindingConfig;
use crate::error::{IdentityError, Result};
use crate::identity::{
    AgentIdentity, IdentityExport, IdentityId, KeyManager, KeyStore, MemoryKeyStore,
    SealedIdentity,
};
use crate::memory::{
    self, NewMemory, SignedMemory, VerificationFailure, VerificationResult,
};
use crate::session::{CrossSessionState, SessionTracker};
use crate::time::{Clock, SystemClock};

/// Identity binding core.
pub struct IdentityBinding {
    config: IdentityBindingConfig,
    keys: KeyManager,
    sessions: SessionTracker,
    clock: Arc<dyn Clock>,
}

impl Default for IdentityBinding {
    fn default() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            config: IdentityBindingConfig::default(),
            keys: KeyManager::new(Arc::new(MemoryKeyStore::new()), clock.clone()),
            sessions: SessionTracker::new(),
            clock,
        }
    }
}

impl IdentityBinding {
    /// Build a core with an in-memory identity store and the wall clock.
    pub fn new(config: IdentityBindingConfig) -> Result<Self> {
        Self::with_parts(config, Arc::new(MemoryKeyStore::new()), Arc::new(SystemClock))
    }

    /// Build a core around an injected identity store and clock.
    pub fn with_parts(
        config: IdentityBindingConfig,
        store: Arc<dyn KeyStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            keys: KeyManager::new(store, clock.clone()),
            sessions: SessionTracker::new(),
            clock,
        })
    }

    pub fn config(&self) -> &IdentityBindingConfig {
        &self.config
    }

    pub fn key_manager(&self) -> &KeyManager {
        &self.keys
    }

    fn now(&self) -> u64 {
        self.clock.now_micros()
    }

    // -----------------------------------------------------------------------
    // Identity management
    // -----------------------------------------------------------------------

    pub fn create_identity(&self, name: &str) -> Result<AgentIdentity> {
        self.keys.create_identity(name)
    }

    pub fn import_identity(&self, name: &str, secret_key: &[u8]) -> Result<AgentIdentity> {
        self.keys.import_identity(name, secret_key)
    }

    pub fn restore_identity(&self, export: &IdentityExport) -> Result<AgentIdentity> {
        self.keys.restore_identity(export)
    }

    pub fn export_identity(&self, id: &IdentityId) -> Option<IdentityExport> {
        self.keys.export_identity(id)
    }

    /// Export an identity sealed under `passphrase`, as JSON.
    pub fn export_identity_encrypted(&self, id: &IdentityId, passphrase: &str) -> Result<String> {
        let export = self
            .keys
            .export_identity(id)
            .ok_or_else(|| IdentityError::NotFound(id.to_string()))?;
        export.seal(passphrase)?.to_json()
    }

    /// Restore an identity from the output of
    /// [`IdentityBinding::export_identity_encrypted`].
    pub fn restore_identity_encrypted(
        &self,
        sealed_json: &str,
        passphrase: &str,
    ) -> Result<AgentIdentity> {
        let export = SealedIdentity::from_json(sealed_json)?.open(passphrase)?;
        self.keys.restore_identity(&export)
    }

    pub fn rotate_keys(&self, id: &IdentityId) -> Result<AgentIdentity> {
        self.keys.rotate_keys(id)
    }

    pub fn get_identity(&self, id: &IdentityId) -> Option<AgentIdentity> {
        self.keys.get_identity(id)
    }

    pub fn get_all_identities(&self) -> Vec<AgentIdentity> {
        self.keys.get_all_identities()
    }

    // -----------------------------------------------------------------------
    // Signing and verification
    // -----------------------------------------------------------------------

    /// Sign a memory with the identity's current key.
    pub fn sign_memory(&self, id: &IdentityId, memory: &NewMemory) -> Result<SignedMemory> {
        let signer = self.keys.signing_record(id)?;
        memory::sign_memory(&signer, memory, self.now())
    }

    /// Verify a signed memory against its own embedded key.
    pub fn verify_memory(&self, record: &SignedMemory) -> VerificationResult {
        memory::verify_memory(record, self.config.signature_expiry_hours, self.now())
    }

    /// Decide whether a possibly-unsigned memory may be accepted.
    ///
    /// With `requireSignatures` off, an absent signature is admitted with
    /// no agent attached. A present signature is always verified.
    pub fn check_admission(&self, record: Option<&SignedMemory>) -> VerificationResult {
        match record {
            Some(record) => self.verify_memory(record),
            None if self.config.require_signatures => {
                VerificationResult::failed(VerificationFailure::Unsigned)
            }
            None => VerificationResult {
                valid: true,
                agent_id: None,
                signed_at: None,
                signature_age: None,
                error: None,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Cross-session trust
    // -----------------------------------------------------------------------

    /// Open a session bound to one identity.
    pub fn init_cross_session(
        &self,
        id: &IdentityId,
        session_id: Option<String>,
    ) -> Result<CrossSessionState> {
        self.require_cross_session()?;
        let identity = self
            .keys
            .get_identity(id)
            .ok_or_else(|| IdentityError::NotFound(id.to_string()))?;
        self.sessions.open(identity, session_id, self.now())
    }

    /// Verify a memory inside a session and count it towards trust.
    ///
    /// A memory signed by another agent, or by a key the bound agent never
    /// held, is rejected as `IdentityMismatch` whatever its signature says.
    pub fn verify_in_session(
        &self,
        session_id: &str,
        record: &SignedMemory,
    ) -> Result<VerificationResult> {
        self.require_cross_session()?;
        let bound = self.sessions.bound_agent(session_id)?;

        if record.signature.agent_id != bound || !self.holds_key(&bound, session_id, record) {
            log::debug!(
                "session {session_id} bound to {bound} rejected memory signed as {}",
                record.signature.agent_id
            );
            return Ok(VerificationResult::failed(
                VerificationFailure::IdentityMismatch,
            ));
        }

        let result = self.verify_memory(record);
        if result.valid
            && self
                .sessions
                .record_verified(session_id, &bound, self.config.trust_threshold, self.now())?
                .is_none()
        {
            log::debug!("session {session_id} was rebound while verifying a memory from {bound}");
            return Ok(VerificationResult::failed(
                VerificationFailure::IdentityMismatch,
            ));
        }
        Ok(result)
    }

    pub fn get_session_state(&self, session_id: &str) -> Option<CrossSessionState> {
        self.sessions.get(session_id)
    }

    pub fn is_trust_established(&self, session_id: &str) -> bool {
        self.sessions.is_trusted(session_id)
    }

    /// Close a session. Returns whether it existed.
    pub fn end_session(&self, session_id: &str) -> bool {
        self.sessions.end(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn require_cross_session(&self) -> Result<()> {
        if self.config.enable_cross_session {
            Ok(())
        } else {
            Err(IdentityError::CrossSessionDisabled)
        }
    }

    /// Whether the record's embedded key is one `agent` has held at the
    /// claimed key version. Prefers the live identity so keys rotated in
    /// after the session opened are recognised.
    fn holds_key(&self, agent: &IdentityId, session_id: &str, record: &SignedMemory) -> bool {
        let identity = self
            .keys
            .get_identity(agent)
            .or_else(|| self.sessions.get(session_id).map(|s| s.agent_identity));
        identity
            .and_then(|i| i.key_for_version(record.signature.key_version))
            .is_some_and(|key| key == record.signature.public_key)
    }
}
