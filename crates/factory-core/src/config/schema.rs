//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Main Factory configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Secret storage settings.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Secret storage configuration.
///
/// Passed explicitly to the secret store constructors; nothing in the
/// storage layer reads global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Which storage tier to use.
    #[serde(default)]
    pub storage: StoragePreference,

    /// Service namespace for entries in the OS keychain.
    #[serde(default = "default_service")]
    pub service: String,

    /// Directory for the encrypted-file tier (defaults to `~/.factory/secrets`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            storage: StoragePreference::default(),
            service: default_service(),
            dir: None,
        }
    }
}

fn default_service() -> String {
    "code-factory".to_string()
}

/// Requested secret storage tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePreference {
    /// Use the OS keychain when it works, otherwise encrypted files.
    #[default]
    Auto,
    /// Require the OS keychain.
    Keyring,
    /// Always use encrypted files.
    File,
}

impl fmt::Display for StoragePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Keyring => "keyring",
            Self::File => "file",
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.secrets.storage, StoragePreference::Auto);
        assert_eq!(config.secrets.service, "code-factory");
        assert!(config.secrets.dir.is_none());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_storage_preference_serde() {
        let pref: StoragePreference = serde_json::from_str("\"keyring\"").unwrap();
        assert_eq!(pref, StoragePreference::Keyring);
        assert_eq!(
            serde_json::to_string(&StoragePreference::File).unwrap(),
            "\"file\""
        );
        assert!(serde_json::from_str::<StoragePreference>("\"env\"").is_err());
    }

    #[test]
    fn test_partial_secrets_section() {
        let config: Config = serde_json::from_str(r#"{"secrets": {"storage": "file"}}"#).unwrap();
        assert_eq!(config.secrets.storage, StoragePreference::File);
        assert_eq!(config.secrets.service, "code-factory");
    }

    #[test]
    fn test_dir_omitted_when_unset() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["secrets"].get("dir").is_none());
    }
}
