//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Name of the Factory home directory under the user's home.
const HOME_DIR_NAME: &str = ".factory";

/// Get the Factory base directory (`~/.factory`, or `$FACTORY_HOME`).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    resolve_base_dir(env::get_var(env::vars::FACTORY_HOME), dirs::home_dir())
        .ok_or(ConfigError::NoHomeDir)
}

fn resolve_base_dir(override_dir: Option<String>, home: Option<PathBuf>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) => Some(expand_tilde_with(&dir, home.as_deref())),
        None => home.map(|h| h.join(HOME_DIR_NAME)),
    }
}

/// Get the main config file path (`~/.factory/factory.json5`).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("factory.json5"))
}

/// Get the encrypted secrets directory (`~/.factory/secrets`).
pub fn secrets_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("secrets"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, dirs::home_dir().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Create `dir` (and parents) and restrict it to the owning user.
///
/// On non-Unix platforms only the directory creation happens.
pub fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}
