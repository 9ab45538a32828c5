//! One-off content signatures that need no registered identity.
//!
//! The signed message is `SHA-256(raw content hash || timestamp as decimal)`.

use serde::{Deserialize, Serialize};

use crate::crypto::keys::Ed25519KeyPair;
use crate::crypto::{hash, signing};
use crate::error::Result;

/// Signature over a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSignature {
    /// Base64 Ed25519 signature.
    pub signature: String,
    /// Hex SHA-256 of the content.
    pub hash: String,
    pub timestamp: u64,
}

/// Sign `content` with a raw secret key, stamped with the current time.
pub fn sign_memory_content(content: &[u8], secret_key: &[u8]) -> Result<ContentSignature> {
    sign_memory_content_at(content, secret_key, crate::time::now_micros())
}

/// Sign `content` with an explicit timestamp.
pub fn sign_memory_content_at(
    content: &[u8],
    secret_key: &[u8],
    timestamp: u64,
) -> Result<ContentSignature> {
    let key_pair = Ed25519KeyPair::from_secret_bytes(secret_key)?;
    let content_hash = hash::sha256(content);
    let message = content_message(&content_hash, timestamp);
    Ok(ContentSignature {
        signature: signing::sign_to_base64(key_pair.signing_key(), &message),
        hash: hex::encode(content_hash),
        timestamp,
    })
}

/// Check a [`ContentSignature`]'s parts against `content`. Any malformed
/// input reads as not verified.
pub fn verify_memory_content(
    content: &[u8],
    signature_b64: &str,
    public_key: &[u8; 32],
    timestamp: u64,
) -> bool {
    let Ok(verifying_key) = Ed25519KeyPair::verifying_key_from_bytes(public_key) else {
        return false;
    };
    let message = content_message(&hash::sha256(content), timestamp);
    signing::verify_from_base64(&verifying_key, &message, signature_b64).is_ok()
}

fn content_message(content_hash: &[u8; 32], timestamp: u64) -> [u8; 32] {
    let mut buf = Vec::with_capacity(32 + 20);
    buf.extend_from_slice(content_hash);
    buf.extend_from_slice(timestamp.to_string().as_bytes());
    hash::sha256(&buf)
}
