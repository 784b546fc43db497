//! AES-256-GCM envelope cipher.
//!
//! The cipher itself is stateless: the caller supplies the derived key and a
//! nonce that must never repeat under that key. [`random_nonce`] and
//! [`random_salt`] draw from the OS CSPRNG and are called on every write.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::kdf::{KEY_SIZE, SALT_SIZE};

/// AES-GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// The AEAD rejected the ciphertext.
///
/// Deliberately carries no detail: wrong keys and tampered bytes are
/// indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityError;

/// Generate a fresh random KDF salt.
pub fn random_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Generate a fresh random nonce.
pub fn random_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt `plaintext`, returning the ciphertext with the tag appended.
pub fn seal(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    // Encryption only fails for inputs beyond GCM's ~64 GiB limit.
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .expect("AES-GCM encryption should not fail for in-memory secrets")
}

/// Decrypt and authenticate `ciphertext` produced by [`seal`].
pub fn open(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>, IntegrityError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| IntegrityError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(byte: u8) -> [u8; KEY_SIZE] {
        [byte; KEY_SIZE]
    }

    #[test]
    fn test_round_trip_seal_open() {
        let key = test_key(1);
        let nonce = random_nonce();
        let plaintext = b"hello, secret world!";

        let sealed = seal(&key, &nonce, plaintext);
        assert_eq!(sealed.len(), plaintext.len() + TAG_SIZE);

        let opened = open(&key, &nonce, &sealed).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let nonce = random_nonce();
        let sealed = seal(&test_key(1), &nonce, b"sensitive data");

        assert_eq!(open(&test_key(2), &nonce, &sealed), Err(IntegrityError));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let key = test_key(1);
        let sealed = seal(&key, &[0u8; NONCE_SIZE], b"sensitive data");

        assert_eq!(open(&key, &[1u8; NONCE_SIZE], &sealed), Err(IntegrityError));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key(3);
        let nonce = random_nonce();
        let sealed = seal(&key, &nonce, b"important secret");

        for idx in [0, sealed.len() / 2, sealed.len() - 1] {
            let mut tampered = sealed.clone();
            tampered[idx] ^= 0x01;
            assert!(
                open(&key, &nonce, &tampered).is_err(),
                "flipping byte {idx} should fail authentication"
            );
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = test_key(4);
        let nonce = random_nonce();
        let sealed = seal(&key, &nonce, b"value");

        assert!(open(&key, &nonce, &sealed[..TAG_SIZE - 1]).is_err());
        assert!(open(&key, &nonce, &[]).is_err());
    }

    #[test]
    fn test_empty_plaintext_works() {
        let key = test_key(5);
        let nonce = random_nonce();

        let sealed = seal(&key, &nonce, b"");
        assert_eq!(sealed.len(), TAG_SIZE);
        assert_eq!(open(&key, &nonce, &sealed).unwrap(), b"");
    }

    #[test]
    fn test_random_values_differ() {
        assert_ne!(random_nonce(), random_nonce());
        assert_ne!(random_salt(), random_salt());
    }
}
