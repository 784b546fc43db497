//! Argon2id password-based key derivation.
//!
//! The parameters are fixed so that every envelope ever written derives the
//! same key from the same `(password, salt)` pair. Changing any of them makes
//! existing secrets unreadable.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

/// Salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Argon2 time cost (iterations).
const TIME_COST: u32 = 1;

/// Argon2 memory cost in KiB (64 MiB).
const MEMORY_COST_KIB: u32 = 64 * 1024;

/// Argon2 parallelism (lanes).
const PARALLELISM: u32 = 4;

/// Derive a 256-bit key from `password` and `salt` with Argon2id.
///
/// Deterministic and free of I/O. The key is wiped when the returned buffer
/// is dropped.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_SIZE]) -> Zeroizing<[u8; KEY_SIZE]> {
    // The parameters are constants within Argon2's accepted ranges and the
    // salt is long enough, so neither call can fail.
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(KEY_SIZE))
        .expect("Argon2 parameters are valid constants");
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    argon2
        .hash_password_into(password, salt, &mut key[..])
        .expect("Argon2id derivation should not fail for a 16-byte salt");
    key
}
