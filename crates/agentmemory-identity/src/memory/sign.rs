//! Memory signing with an identity's current key.

use crate::crypto::{hash, signing};
use crate::error::Result;
use crate::identity::IdentityRecord;

use super::payload::{canonical_payload, PayloadFields};
use super::signed::{MemorySignature, NewMemory, SignedMemory, SIGNED_MEMORY_VERSION};

/// Sign `memory` with the record's current key, stamped at `timestamp`.
///
/// The returned signature carries the public key and key version that
/// were current at signing time.
pub fn sign_memory(
    signer: &IdentityRecord,
    memory: &NewMemory,
    timestamp: u64,
) -> Result<SignedMemory> {
    memory.metadata.validate()?;

    let identity = &signer.identity;
    let content_hash = hash::sha256_hex(&memory.content);
    let content_size = memory.content.len() as u64;

    let payload = canonical_payload(&PayloadFields {
        key: &memory.key,
        content_hash: &content_hash,
        content_size,
        metadata: &memory.metadata,
        vault: &memory.vault,
        timestamp,
        key_version: identity.key_version,
        agent_id: identity.id.as_str(),
        version: SIGNED_MEMORY_VERSION,
    });
    let signature = signing::sign(signer.key_pair.signing_key(), &payload);

    Ok(SignedMemory {
        key: memory.key.clone(),
        content_hash,
        content_size,
        metadata: memory.metadata.clone(),
        vault: memory.vault.clone(),
        version: SIGNED_MEMORY_VERSION,
        signature: MemorySignature {
            agent_id: identity.id.clone(),
            signature,
            public_key: signer.key_pair.verifying_key_bytes(),
            timestamp,
            key_version: identity.key_version,
        },
    })
}
