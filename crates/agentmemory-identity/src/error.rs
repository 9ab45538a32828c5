//! Error types for the identity binding core.
//!
//! All errors are strongly typed and propagated without panicking.
//! Secret key material is never included in error messages.
//!
//! Verification outcomes are *not* errors: a memory that fails to verify
//! is reported through [`crate::memory::VerificationResult`].

/// Identity binding error types covering caller misuse and malformed input.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already exists: {0}")]
    SessionExists(String),

    #[error("Cross-session verification is disabled")]
    CrossSessionDisabled,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid backup format: {0}")]
    InvalidFileFormat(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
