//! Ed25519 sign/verify over raw bytes.
//!
//! Any verification failure, including an undecodable public key, is
//! `SignatureInvalid`.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::crypto::keys::Ed25519KeyPair;
use crate::error::{IdentityError, Result};

pub fn sign(signing_key: &SigningKey, message: &[u8]) -> [u8; 64] {
    signing_key.sign(message).to_bytes()
}

pub fn verify(verifying_key: &VerifyingKey, message: &[u8], signature: &[u8; 64]) -> Result<()> {
    let signature = Signature::from_bytes(signature);
    verifying_key
        .verify(message, &signature)
        .map_err(|_| IdentityError::SignatureInvalid)
}

/// Verify against raw public key bytes, as embedded in a signed memory.
pub fn verify_with_public_key(
    public_key: &[u8; 32],
    message: &[u8],
    signature: &[u8; 64],
) -> Result<()> {
    let verifying_key = Ed25519KeyPair::verifying_key_from_bytes(public_key)
        .map_err(|_| IdentityError::SignatureInvalid)?;
    verify(&verifying_key, message, signature)
}

/// Base64 form of [`sign`].
pub fn sign_to_base64(signing_key: &SigningKey, message: &[u8]) -> String {
    crate::encoding::to_base64(sign(signing_key, message))
}

/// Verify a base64 signature. Malformed base64 or a wrong length is an
/// `InvalidKey` error rather than a failed check.
pub fn verify_from_base64(
    verifying_key: &VerifyingKey,
    message: &[u8],
    signature_b64: &str,
) -> Result<()> {
    let sig_array: [u8; 64] = crate::encoding::array_from_base64(signature_b64)
        .map_err(|e| IdentityError::InvalidKey(format!("invalid signature: {e}")))?;
    verify(verifying_key, message, &sig_array)
}
