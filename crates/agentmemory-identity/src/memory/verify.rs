//! Signed memory verification using only what the record carries.
//!
//! Verification is stateless: the signer's *current* key is never looked
//! up, so memories signed before a key rotation stay verifiable.

use serde::{Deserialize, Serialize};

use crate::crypto::signing;
use crate::identity::IdentityId;
use crate::time::MICROS_PER_HOUR;

use super::payload::{canonical_payload, PayloadFields};
use super::signed::SignedMemory;

/// Why a memory did not verify.
///
/// Tampering, corruption and impersonation all surface as
/// `InvalidSignature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFailure {
    InvalidSignature,
    ExpiredSignature,
    IdentityMismatch,
    Unsigned,
}

impl std::fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::InvalidSignature => "Invalid signature",
            Self::ExpiredSignature => "Signature has expired",
            Self::IdentityMismatch => "Agent identity mismatch",
            Self::Unsigned => "Memory is not signed",
        };
        f.write_str(msg)
    }
}

/// Outcome of verifying one memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<IdentityId>,
    /// Signing time (microseconds since Unix epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<u64>,
    /// Age of the signature in microseconds at verification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_age: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<VerificationFailure>,
}

impl VerificationResult {
    pub fn verified(agent_id: IdentityId, signed_at: u64, signature_age: u64) -> Self {
        Self {
            valid: true,
            agent_id: Some(agent_id),
            signed_at: Some(signed_at),
            signature_age: Some(signature_age),
            error: None,
        }
    }

    pub fn failed(reason: VerificationFailure) -> Self {
        Self {
            valid: false,
            agent_id: None,
            signed_at: None,
            signature_age: None,
            error: Some(reason),
        }
    }

    /// Human-readable failure message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }
}

/// Verify a signed memory at time `now`.
///
/// `expiry_hours == 0` disables the age check. The cryptographic check
/// runs first; an expired but genuine signature reports its age.
pub fn verify_memory(record: &SignedMemory, expiry_hours: u64, now: u64) -> VerificationResult {
    let payload = canonical_payload(&PayloadFields::from_record(record));
    let sig = &record.signature;

    if signing::verify_with_public_key(&sig.public_key, &payload, &sig.signature).is_err() {
        log::debug!(
            "memory {}/{} failed signature check (claimed signer {})",
            record.vault,
            record.key,
            sig.agent_id
        );
        return VerificationResult::failed(VerificationFailure::InvalidSignature);
    }

    let age = now.saturating_sub(sig.timestamp);
    if expiry_hours > 0 && age > expiry_hours.saturating_mul(MICROS_PER_HOUR) {
        log::debug!(
            "memory {}/{} signature expired: age {age}us exceeds {expiry_hours}h",
            record.vault,
            record.key
        );
        let mut result = VerificationResult::failed(VerificationFailure::ExpiredSignature);
        result.signature_age = Some(age);
        return result;
    }

    VerificationResult::verified(sig.agent_id.clone(), sig.timestamp, age)
}
