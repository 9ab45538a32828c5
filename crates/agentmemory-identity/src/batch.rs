//! Order-preserving bulk sign and verify.
//!
//! Each item is handled exactly as the single-item call would handle it;
//! a failing item never stops the rest.

use crate::binding::IdentityBinding;
use crate::error::Result;
use crate::identity::IdentityId;
use crate::memory::{NewMemory, SignedMemory, VerificationResult};

impl IdentityBinding {
    /// Sign each memory in order. Output position `i` holds the outcome
    /// for input `i`.
    pub fn batch_sign_memories(
        &self,
        id: &IdentityId,
        memories: &[NewMemory],
    ) -> Vec<Result<SignedMemory>> {
        memories.iter().map(|m| self.sign_memory(id, m)).collect()
    }

    /// Verify each record in order.
    pub fn batch_verify_memories(&self, records: &[SignedMemory]) -> Vec<VerificationResult> {
        let results: Vec<VerificationResult> =
            records.iter().map(|r| self.verify_memory(r)).collect();
        let failed = results.iter().filter(|r| !r.valid).count();
        if failed > 0 {
            log::debug!("batch verify: {failed} of {} records invalid", results.len());
        }
        results
    }
}
