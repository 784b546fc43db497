//! OS keychain secret store.
//!
//! Entries live under one service namespace with the secret name as the
//! account:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)
//!
//! The platform binding sits behind [`CredentialBackend`] so the error
//! mapping and the availability probe can be exercised without a keychain
//! daemon.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use factory_core::SecretString;
use keyring::Entry;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, SecretError};
use crate::store::{validate_name, SecretStore};

/// Account written and removed by the availability probe.
const PROBE_ACCOUNT: &str = "__factory_probe__";

/// Raw credential operations on a `(service, account)` pair.
pub trait CredentialBackend: Send + Sync {
    fn get_password(&self, service: &str, account: &str) -> keyring::Result<String>;

    fn set_password(&self, service: &str, account: &str, password: &str) -> keyring::Result<()>;

    fn delete_password(&self, service: &str, account: &str) -> keyring::Result<()>;
}

/// The platform keychain, via the `keyring` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsKeyring;

impl CredentialBackend for OsKeyring {
    fn get_password(&self, service: &str, account: &str) -> keyring::Result<String> {
        Entry::new(service, account)?.get_password()
    }

    fn set_password(&self, service: &str, account: &str, password: &str) -> keyring::Result<()> {
        Entry::new(service, account)?.set_password(password)
    }

    fn delete_password(&self, service: &str, account: &str) -> keyring::Result<()> {
        Entry::new(service, account)?.delete_credential()
    }
}

/// In-process credential backend.
///
/// Behaves like a keychain that forgets everything when dropped. It can be
/// switched off to mimic a locked or absent keychain daemon.
#[derive(Debug, Default)]
pub struct MemoryKeyring {
    entries: Mutex<HashMap<(String, String), String>>,
    unavailable: AtomicBool,
    failing_deletes: AtomicBool,
}

impl MemoryKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// A keyring on which every call fails, like a headless machine.
    pub fn unavailable() -> Self {
        let keyring = Self::new();
        keyring.set_available(false);
        keyring
    }

    /// Toggle availability after construction.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Make every delete fail while reads and writes keep working.
    pub fn fail_deletes(&self, fail: bool) {
        self.failing_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored entries across all services.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn check_access(&self) -> keyring::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(keyring::Error::NoStorageAccess(
                "keychain daemon not reachable".into(),
            ));
        }
        Ok(())
    }
}

impl CredentialBackend for MemoryKeyring {
    fn get_password(&self, service: &str, account: &str) -> keyring::Result<String> {
        self.check_access()?;
        self.entries
            .lock()
            .get(&(service.to_string(), account.to_string()))
            .cloned()
            .ok_or(keyring::Error::NoEntry)
    }

    fn set_password(&self, service: &str, account: &str, password: &str) -> keyring::Result<()> {
        self.check_access()?;
        self.entries
            .lock()
            .insert((service.to_string(), account.to_string()), password.to_string());
        Ok(())
    }

    fn delete_password(&self, service: &str, account: &str) -> keyring::Result<()> {
        self.check_access()?;
        if self.failing_deletes.load(Ordering::SeqCst) {
            return Err(keyring::Error::PlatformFailure(
                "delete rejected by keychain".into(),
            ));
        }
        self.entries
            .lock()
            .remove(&(service.to_string(), account.to_string()))
            .map(|_| ())
            .ok_or(keyring::Error::NoEntry)
    }
}

/// Secret store backed by the OS keychain.
pub struct KeyringStore {
    service: String,
    backend: Arc<dyn CredentialBackend>,
}

impl KeyringStore {
    /// Create a store over the platform keychain under `service`.
    pub fn new(service: impl Into<String>) -> Self {
        Self::with_backend(service, Arc::new(OsKeyring))
    }

    /// Create a store over an explicit credential backend.
    pub fn with_backend(service: impl Into<String>, backend: Arc<dyn CredentialBackend>) -> Self {
        Self {
            service: service.into(),
            backend,
        }
    }

    /// Service namespace the entries are stored under.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Check whether the keychain accepts writes on this machine.
    ///
    /// Writes a marker entry and removes it again. Only the write decides
    /// availability; a failed cleanup is logged and otherwise ignored.
    pub fn is_available(&self) -> bool {
        if let Err(e) = self
            .backend
            .set_password(&self.service, PROBE_ACCOUNT, "probe")
        {
            debug!(service = %self.service, error = %e, "keychain probe write failed");
            return false;
        }

        if let Err(e) = self.backend.delete_password(&self.service, PROBE_ACCOUNT) {
            warn!(
                service = %self.service,
                error = %e,
                "could not remove keychain probe entry"
            );
        }

        debug!(service = %self.service, "keychain available");
        true
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, name: &str) -> Result<SecretString> {
        validate_name(name)?;
        match self.backend.get_password(&self.service, name) {
            Ok(value) => {
                debug!(name, service = %self.service, "read secret from keychain");
                Ok(SecretString::new(value))
            }
            Err(keyring::Error::NoEntry) => Err(SecretError::NotFound(name.to_string())),
            Err(e) => Err(SecretError::Keychain(format!(
                "keychain read failed for '{name}': {e}"
            ))),
        }
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        debug!(name, service = %self.service, "writing secret to keychain");
        self.backend
            .set_password(&self.service, name, value)
            .map_err(|e| SecretError::Keychain(format!("keychain write failed for '{name}': {e}")))
    }

    fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        match self.backend.delete_password(&self.service, name) {
            Ok(()) => {
                debug!(name, service = %self.service, "deleted secret from keychain");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Err(SecretError::NotFound(name.to_string())),
            Err(e) => Err(SecretError::Keychain(format!(
                "keychain delete failed for '{name}': {e}"
            ))),
        }
    }
}
