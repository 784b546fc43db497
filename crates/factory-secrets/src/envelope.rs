//! On-disk envelope format for the encrypted-file tier.
//!
//! Layout: `base64(salt[16] || nonce[12] || ciphertext)` with the standard
//! padded alphabet. There is no version field; changing the layout requires
//! an explicit migration.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{self, IntegrityError, NONCE_SIZE};
use crate::kdf::{self, SALT_SIZE};

/// Bytes preceding the ciphertext.
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// Why stored bytes could not be parsed as an envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedEnvelope {
    #[error("invalid base64: {0}")]
    Base64(String),

    #[error("envelope is {0} bytes, shorter than the {HEADER_SIZE}-byte header")]
    TooShort(usize),
}

/// One encrypted secret at rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: [u8; SALT_SIZE],
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encrypt `plaintext` under `password` with a fresh salt and nonce.
    pub fn seal(password: &[u8], plaintext: &[u8]) -> Self {
        let salt = crypto::random_salt();
        let nonce = crypto::random_nonce();
        let key = kdf::derive_key(password, &salt);
        let ciphertext = crypto::seal(&key, &nonce, plaintext);

        Self {
            salt,
            nonce,
            ciphertext,
        }
    }

    /// Re-derive the key from `password` and decrypt.
    pub fn open(&self, password: &[u8]) -> Result<Zeroizing<Vec<u8>>, IntegrityError> {
        let key = kdf::derive_key(password, &self.salt);
        crypto::open(&key, &self.nonce, &self.ciphertext).map(Zeroizing::new)
    }

    /// Serialize to the raw `salt || nonce || ciphertext` byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Parse the raw byte layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MalformedEnvelope> {
        if bytes.len() < HEADER_SIZE {
            return Err(MalformedEnvelope::TooShort(bytes.len()));
        }

        let (salt, rest) = bytes.split_at(SALT_SIZE);
        let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);

        let mut envelope = Self {
            salt: [0u8; SALT_SIZE],
            nonce: [0u8; NONCE_SIZE],
            ciphertext: ciphertext.to_vec(),
        };
        envelope.salt.copy_from_slice(salt);
        envelope.nonce.copy_from_slice(nonce);
        Ok(envelope)
    }

    /// Encode as the file contents.
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decode file contents.
    pub fn decode(text: &[u8]) -> Result<Self, MalformedEnvelope> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|e| MalformedEnvelope::Base64(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}
