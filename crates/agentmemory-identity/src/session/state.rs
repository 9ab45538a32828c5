//! Session trust state.

use serde::{Deserialize, Serialize};

use crate::identity::AgentIdentity;

/// Where a session stands on the way to trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustPhase {
    /// No successful verifications yet.
    Initialized,
    /// Some verifications, below the threshold.
    Accumulating,
    /// Threshold reached. Never reverts.
    Trusted,
}

/// State of one cross-session verification context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSessionState {
    pub session_id: String,
    /// Snapshot of the identity at session creation.
    pub agent_identity: AgentIdentity,
    pub verified_memories: u64,
    /// Time of the last successful verification, or of creation.
    pub last_verified_at: u64,
    pub trust_established: bool,
}

impl CrossSessionState {
    pub(crate) fn new(session_id: String, agent_identity: AgentIdentity, now: u64) -> Self {
        Self {
            session_id,
            agent_identity,
            verified_memories: 0,
            last_verified_at: now,
            trust_established: false,
        }
    }

    pub fn phase(&self) -> TrustPhase {
        if self.trust_established {
            TrustPhase::Trusted
        } else if self.verified_memories == 0 {
            TrustPhase::Initialized
        } else {
            TrustPhase::Accumulating
        }
    }

    /// Count one successful verification. Returns true if this call
    /// established trust.
    pub(crate) fn record_success(&mut self, trust_threshold: u32, now: u64) -> bool {
        self.verified_memories += 1;
        self.last_verified_at = now;
        let reached = self.verified_memories >= u64::from(trust_threshold);
        let newly_trusted = reached && !self.trust_established;
        self.trust_established |= reached;
        newly_trusted
    }
}
