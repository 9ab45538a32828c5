//! Cryptographic primitives: Ed25519 keys and signatures, SHA-256,
//! passphrase sealing, and CSPRNG bytes.

pub mod hash;
pub mod keys;
pub mod random;
pub mod seal;
pub mod signing;
