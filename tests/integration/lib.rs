//! Shared fixtures for the integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use factory_core::config::{Config, StoragePreference};
use factory_core::SecretString;
use factory_secrets::{AutoStore, KeyringStore, MemoryKeyring};
use tempfile::TempDir;

/// Password used by the fixtures unless a test picks its own.
pub const PASSWORD: &str = "integration-password";

/// A temporary Factory home with a config pointing into it.
pub struct Fixture {
    pub home: TempDir,
    pub config: Config,
}

impl Fixture {
    /// New home whose secrets live under `<home>/secrets`.
    pub fn new(storage: StoragePreference) -> Self {
        let home = TempDir::new().expect("create temp home");
        let mut config = Config::default();
        config.secrets.storage = storage;
        config.secrets.service = "factory-integration".to_string();
        config.secrets.dir = Some(home.path().join("secrets"));
        Self { home, config }
    }

    pub fn secrets_dir(&self) -> PathBuf {
        self.config.secrets_dir().expect("secrets dir")
    }

    pub fn secret_file(&self, name: &str) -> PathBuf {
        self.secrets_dir().join(format!("{name}.enc"))
    }

    /// Build a store over `keychain` with the given file-tier password.
    pub fn store(&self, keychain: Arc<MemoryKeyring>, password: &str) -> AutoStore {
        let password = SecretString::new(password);
        AutoStore::with_keychain(
            &self.config.secrets,
            KeyringStore::with_backend(self.config.secrets.service.clone(), keychain),
            self.secrets_dir(),
            move || Ok(password),
        )
        .expect("build store")
    }

    /// Store on a machine without a usable keychain.
    pub fn headless_store(&self, password: &str) -> AutoStore {
        self.store(Arc::new(MemoryKeyring::unavailable()), password)
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }
}
