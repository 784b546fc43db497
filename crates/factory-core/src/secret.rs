//! Credential values kept out of logs and wiped from memory.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A credential or store password that is zeroed on drop.
///
/// Values come back from a secret store, or are typed at the password
/// prompt for the encrypted-file tier. Formatting only ever shows the byte
/// length, so a stray `{:?}` in a log line leaks nothing.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Take ownership of decrypted bytes.
    ///
    /// Returns `None` for invalid UTF-8, after wiping the rejected buffer.
    pub fn from_utf8(bytes: Vec<u8>) -> Option<Self> {
        String::from_utf8(bytes)
            .map(|inner| Self { inner })
            .map_err(|e| e.into_bytes().zeroize())
            .ok()
    }

    /// The plaintext value. Keep the borrow short.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Raw bytes, as fed to the key derivation and the cipher.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString(<{} bytes redacted>)", self.inner.len())
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
