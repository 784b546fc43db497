//! Tier selection between the OS keychain and encrypted files.
//!
//! The tier is decided once, when the store is built, and never revisited.
//! If the keychain stops working later, operations fail instead of quietly
//! moving secrets to another location.

use std::fmt;
use std::path::PathBuf;

use factory_core::config::{SecretsConfig, StoragePreference};
use factory_core::SecretString;
use tracing::info;

use crate::error::{Result, SecretError};
use crate::keychain::KeyringStore;
use crate::store::{FileSecretStore, SecretStore};

/// The storage tier in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Secrets live in the OS keychain.
    Keyring,
    /// Secrets live in password-encrypted files.
    EncryptedFile,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keyring => "OS keychain",
            Self::EncryptedFile => "encrypted file",
        })
    }
}

enum Backend {
    Keyring(KeyringStore),
    File(FileSecretStore),
}

/// A secret store that uses the best tier available on this machine.
pub struct AutoStore {
    backend: Backend,
}

impl AutoStore {
    /// Select a tier using the platform keychain.
    ///
    /// `password` is only called when the encrypted-file tier is selected,
    /// so callers can defer prompting until it is actually needed.
    pub fn new<F>(config: &SecretsConfig, secrets_dir: impl Into<PathBuf>, password: F) -> Result<Self>
    where
        F: FnOnce() -> Result<SecretString>,
    {
        let keychain = KeyringStore::new(config.service.clone());
        Self::with_keychain(config, keychain, secrets_dir, password)
    }

    /// Select a tier using an explicit keychain store.
    pub fn with_keychain<F>(
        config: &SecretsConfig,
        keychain: KeyringStore,
        secrets_dir: impl Into<PathBuf>,
        password: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> Result<SecretString>,
    {
        let use_keychain = match config.storage {
            StoragePreference::File => false,
            StoragePreference::Auto => keychain.is_available(),
            StoragePreference::Keyring => {
                if !keychain.is_available() {
                    return Err(SecretError::BackendUnavailable(format!(
                        "OS keychain is not usable for service '{}'",
                        keychain.service()
                    )));
                }
                true
            }
        };

        if use_keychain {
            info!(service = keychain.service(), "storing secrets in the OS keychain");
            return Ok(Self {
                backend: Backend::Keyring(keychain),
            });
        }

        let dir = secrets_dir.into();
        if config.storage == StoragePreference::Auto {
            info!(dir = %dir.display(), "OS keychain unavailable, falling back to encrypted files");
        } else {
            info!(dir = %dir.display(), "storing secrets in encrypted files");
        }

        let store = FileSecretStore::open(dir, password()?)?;
        Ok(Self {
            backend: Backend::File(store),
        })
    }

    /// The tier selected at construction.
    pub fn tier(&self) -> Tier {
        match self.backend {
            Backend::Keyring(_) => Tier::Keyring,
            Backend::File(_) => Tier::EncryptedFile,
        }
    }

    /// True when secrets go to encrypted files instead of the keychain.
    pub fn using_fallback(&self) -> bool {
        self.tier() == Tier::EncryptedFile
    }

    /// The keychain backend, when that tier is active.
    pub fn keychain(&self) -> Option<&KeyringStore> {
        match &self.backend {
            Backend::Keyring(store) => Some(store),
            Backend::File(_) => None,
        }
    }

    /// The encrypted-file backend, when that tier is active.
    pub fn file_store(&self) -> Option<&FileSecretStore> {
        match &self.backend {
            Backend::File(store) => Some(store),
            Backend::Keyring(_) => None,
        }
    }

    fn active(&self) -> &dyn SecretStore {
        match &self.backend {
            Backend::Keyring(store) => store,
            Backend::File(store) => store,
        }
    }
}

impl SecretStore for AutoStore {
    fn get(&self, name: &str) -> Result<SecretString> {
        self.active().get(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.active().set(name, value)
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.active().delete(name)
    }

    fn contains(&self, name: &str) -> Result<bool> {
        self.active().contains(name)
    }
}
