//! Error types for secret management.

use thiserror::Error;

/// Errors that can occur during secret operations.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The envelope authenticated badly: wrong password or tampered bytes.
    #[error("Decryption failed for '{0}': wrong password or tampered data")]
    DecryptionFailed(String),

    /// The stored data is not a well-formed envelope.
    #[error("Secret '{name}' is corrupted: {reason}")]
    Corrupted { name: String, reason: String },

    #[error("Secret backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Invalid secret name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SecretError {
    /// True when the secret simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True when a secret exists but could not be read back intact.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed(_) | Self::Corrupted { .. })
    }

    pub(crate) fn corrupted(name: &str, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience result alias for secret operations.
pub type Result<T> = std::result::Result<T, SecretError>;
