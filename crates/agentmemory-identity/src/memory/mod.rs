//! Signed memories — data model, canonical payload, signing and verification.

pub mod metadata;
pub mod payload;
pub mod sign;
pub mod signed;
pub mod verify;

pub use metadata::{MemoryMetadata, MemoryTag, MemoryType, MAX_IMPORTANCE};
pub use payload::{canonical_payload, PayloadFields};
pub use sign::sign_memory;
pub use signed::{MemorySignature, NewMemory, SignedMemory, SIGNED_MEMORY_VERSION};
pub use verify::{verify_memory, VerificationFailure, VerificationResult};
