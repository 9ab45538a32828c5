//! CSPRNG output for ids, salts and nonces.

use rand::rngs::OsRng;
use rand::RngCore;

/// `N` bytes from the operating system's random source.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}
