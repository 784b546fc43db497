//! Configuration loading and persistence.

use super::{Config, StoragePreference};
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    ///
    /// Parse and I/O errors are still returned; only absence falls back.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment overrides on top of the file configuration.
    ///
    /// `FACTORY_NO_KEYRING` forces the encrypted-file tier.
    pub fn apply_env_overrides(&mut self) {
        if env::get_bool(env::vars::FACTORY_NO_KEYRING) {
            self.secrets.storage = StoragePreference::File;
        }
    }

    /// Directory used by the encrypted-file secret tier.
    pub fn secrets_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.secrets.dir {
            Some(dir) => Ok(paths::expand_tilde(&dir.to_string_lossy())),
            None => paths::secrets_dir(),
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let service = self.secrets.service.trim();
        if service.is_empty() {
            errors.push("Secrets service name cannot be empty".to_string());
        } else if service != self.secrets.service {
            errors.push(format!(
                "Secrets service name '{}' has surrounding whitespace",
                self.secrets.service
            ));
        }

        if let Some(dir) = &self.secrets.dir {
            if dir.as_os_str().is_empty() {
                errors.push("Secrets dir cannot be empty when set".to_string());
            }
        }

        // Return collected errors
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
