//! AgentMemory Identity — identity binding for agent memories.
//!
//! Gives an agent a durable Ed25519 identity, binds stored memories to it
//! with signatures, detects tampering and stale signatures, and builds
//! trust across reconnecting sessions through repeated verification.
//!
//! ```no_run
//! use agentmemory_identity::{IdentityBinding, MemoryMetadata, MemoryType, NewMemory};
//!
//! # fn main() -> agentmemory_identity::Result<()> {
//! let binding = IdentityBinding::default();
//! let agent = binding.create_identity("research-agent")?;
//! let memory = NewMemory::new(
//!     "k1",
//!     "hello",
//!     MemoryMetadata::new(MemoryType::Knowledge, 50),
//!     "v1",
//! );
//! let signed = binding.sign_memory(&agent.id, &memory)?;
//! assert!(binding.verify_memory(&signed).valid);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod binding;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod memory;
pub mod quick;
pub mod session;
pub mod time;

// Re-export primary types
pub use binding::IdentityBinding;
pub use codec::{deserialize_signed_memory, serialize_signed_memory};
pub use config::{IdentityBindingConfig, IDENTITY_BINDING_VERSION};
pub use error::{IdentityError, Result};
pub use identity::{
    AgentIdentity, IdentityExport, IdentityId, KeyManager, KeyStore, MemoryKeyStore, RetiredKey,
    SealedIdentity,
};
pub use memory::{
    MemoryMetadata, MemorySignature, MemoryTag, MemoryType, NewMemory, SignedMemory,
    VerificationFailure, VerificationResult,
};
pub use quick::{sign_memory_content, verify_memory_content, ContentSignature};
pub use session::{CrossSessionState, TrustPhase};
pub use time::{Clock, ManualClock, SystemClock};
