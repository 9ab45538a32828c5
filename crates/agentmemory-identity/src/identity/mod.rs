//! Agent identities and their keys: creation, import, export, rotation.
//!
//! The manager owns every secret key the core holds. Callers only ever
//! see [`AgentIdentity`], the public persona, unless they explicitly
//! ask for an [`IdentityExport`].

pub mod agent;
pub mod backup;
pub mod manager;
pub mod store;

pub use agent::{AgentIdentity, IdentityId, RetiredKey};
pub use backup::{IdentityExport, SealedIdentity};
pub use manager::KeyManager;
pub use store::{IdentityRecord, KeyStore, MemoryKeyStore};
