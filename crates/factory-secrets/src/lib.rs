//! Tiered secret storage for Factory.
//!
//! Credentials (LLM API keys, GitHub tokens) live either in the OS keychain
//! or, when no keychain is usable, in per-secret files encrypted with
//! AES-256-GCM under an Argon2id-derived key. [`AutoStore`] picks the tier
//! once at construction and exposes the same [`SecretStore`] contract as the
//! two backends.
//!
//! ```no_run
//! use factory_core::{Config, SecretString};
//! use factory_secrets::{AutoStore, SecretStore};
//!
//! # fn main() -> factory_secrets::Result<()> {
//! let config = Config::default();
//! let dir = config.secrets_dir().expect("home directory");
//! let store = AutoStore::new(&config.secrets, dir, || {
//!     Ok(SecretString::new("correct horse battery staple"))
//! })?;
//!
//! store.set("openai_api_key", "sk-...")?;
//! let key = store.get("openai_api_key")?;
//! # let _ = key;
//! # Ok(())
//! # }
//! ```

pub mod auto;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod keychain;
pub mod store;

pub use auto::{AutoStore, Tier};
pub use error::{Result, SecretError};
pub use keychain::{CredentialBackend, KeyringStore, MemoryKeyring, OsKeyring};
pub use store::{FileSecretStore, SecretStore};
