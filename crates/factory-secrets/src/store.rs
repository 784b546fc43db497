//! Secret storage backends.
//!
//! Defines the [`SecretStore`] trait and provides [`FileSecretStore`], a
//! file-system-backed implementation that keeps each secret as an encrypted
//! envelope under `~/.factory/secrets/`.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use factory_core::{paths, SecretString};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::envelope::Envelope;
use crate::error::{Result, SecretError};

/// Maximum allowed length for a secret name.
const MAX_NAME_LEN: usize = 128;

/// Extension of envelope files.
const ENVELOPE_EXT: &str = "enc";

/// Synchronous contract shared by every secret backend.
///
/// Calls run to completion on the calling thread. Concurrent writes to the
/// same name are not coordinated; callers serialize them.
pub trait SecretStore: Send + Sync {
    /// Retrieve a secret by name.
    fn get(&self, name: &str) -> Result<SecretString>;

    /// Store a secret under the given name, replacing any previous value.
    fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Delete a secret by name. Missing secrets yield [`SecretError::NotFound`].
    fn delete(&self, name: &str) -> Result<()>;

    /// Check whether a secret with the given name exists.
    fn contains(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Ok(_) => Ok(true),
            Err(SecretError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// A file-system-backed secret store.
///
/// Each secret is stored at `{base_dir}/{name}.enc`. The directory is
/// `0700` and files are `0600` on Unix. Every read re-derives the key; no
/// plaintext or key material is cached.
pub struct FileSecretStore {
    base_dir: PathBuf,
    password: SecretString,
}

impl FileSecretStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>, password: SecretString) -> Result<Self> {
        let store = Self {
            base_dir: base_dir.into(),
            password,
        };
        store.ensure_dir()?;
        Ok(store)
    }

    /// Directory holding the envelope files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Names of all stored secrets, sorted. Nothing is decrypted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENVELOPE_EXT) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(name) if validate_name(name).is_ok() => names.push(name.to_string()),
                _ => debug!(path = %path.display(), "skipping foreign file in secrets dir"),
            }
        }

        names.sort();
        Ok(names)
    }

    fn ensure_dir(&self) -> Result<()> {
        paths::create_private_dir(&self.base_dir)?;
        Ok(())
    }

    /// Resolve the path for a secret file.
    fn secret_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.{ENVELOPE_EXT}"))
    }
}

/// Validate that a secret name contains only safe characters.
///
/// Allowed: ASCII alphanumeric, underscore, hyphen. Max length 128.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SecretError::InvalidName(
            "name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(SecretError::InvalidName(format!(
            "name exceeds maximum length of {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(SecretError::InvalidName(format!(
            "name contains invalid characters (allowed: alphanumeric, underscore, hyphen): {name}"
        )));
    }
    Ok(())
}

/// Create `path` for writing, readable only by the owner on Unix.
fn create_private_file(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

/// Replace `target` with `data` via a temporary file and a rename.
///
/// Readers see either the old file or the new one, never a mix. The
/// temporary name is random so concurrent writers never share one.
fn write_atomic(target: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let stem = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut suffix = [0u8; 8];
    OsRng.fill_bytes(&mut suffix);
    let temp_path = dir.join(format!(".{stem}.{}.tmp", hex::encode(suffix)));

    let result = create_private_file(&temp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, target)
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

impl SecretStore for FileSecretStore {
    fn get(&self, name: &str) -> Result<SecretString> {
        validate_name(name)?;

        let path = self.secret_path(name);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SecretError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let envelope =
            Envelope::decode(&data).map_err(|e| SecretError::corrupted(name, e.to_string()))?;
        let plaintext = envelope
            .open(self.password.as_bytes())
            .map_err(|_| SecretError::DecryptionFailed(name.to_string()))?;
        let value = SecretString::from_utf8(plaintext.to_vec())
            .ok_or_else(|| SecretError::corrupted(name, "plaintext is not valid UTF-8"))?;

        debug!(name, path = %path.display(), "read secret");
        Ok(value)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        self.ensure_dir()?;

        let envelope = Envelope::seal(self.password.as_bytes(), value.as_bytes());
        let path = self.secret_path(name);
        debug!(name, path = %path.display(), "writing secret");
        write_atomic(&path, envelope.encode().as_bytes())?;
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let path = self.secret_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(name, path = %path.display(), "deleted secret");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SecretError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        Ok(self.secret_path(name).is_file())
    }
}
