//! End-to-end behavior of the tiered secret store.

use std::fs;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use factory_core::config::{Config, StoragePreference};
use factory_core::keys;
use factory_secrets::{MemoryKeyring, SecretError, SecretStore, Tier};
use factory_integration_tests::{Fixture, PASSWORD};

#[test]
fn test_api_key_scenario() {
    let fx = Fixture::new(StoragePreference::Auto);
    let store = fx.headless_store(PASSWORD);
    assert_eq!(store.tier(), Tier::EncryptedFile);

    store.set("api_key", "sk-abc123").unwrap();

    let path = fx.secret_file("api_key");
    assert!(path.is_file());
    let raw = STANDARD.decode(fs::read(&path).unwrap()).unwrap();
    assert!(raw.len() > 28);

    assert_eq!(store.get("api_key").unwrap().expose_secret(), "sk-abc123");

    store.delete("api_key").unwrap();
    assert!(matches!(store.get("api_key"), Err(SecretError::NotFound(_))));
    assert!(matches!(store.delete("api_key"), Err(SecretError::NotFound(_))));
}

#[test]
fn test_secrets_survive_a_new_process() {
    let fx = Fixture::new(StoragePreference::File);

    fx.headless_store(PASSWORD)
        .set(keys::GITHUB_TOKEN, "gho_persisted")
        .unwrap();

    // A fresh store over the same directory stands in for a restart.
    let reopened = fx.headless_store(PASSWORD);
    assert_eq!(
        reopened.get(keys::GITHUB_TOKEN).unwrap().expose_secret(),
        "gho_persisted"
    );
}

#[test]
fn test_wrong_password_is_an_integrity_failure() {
    let fx = Fixture::new(StoragePreference::File);
    fx.headless_store(PASSWORD)
        .set(keys::OPENAI_API_KEY, "sk-live")
        .unwrap();

    let err = fx
        .headless_store("some-other-password")
        .get(keys::OPENAI_API_KEY)
        .unwrap_err();
    assert!(matches!(err, SecretError::DecryptionFailed(_)));
    assert!(err.is_integrity_failure());
    assert!(!err.is_not_found());
}

#[test]
fn test_every_envelope_byte_is_protected() {
    let fx = Fixture::new(StoragePreference::File);
    let store = fx.headless_store(PASSWORD);
    store.set("token", "v").unwrap();

    let path = fx.secret_file("token");
    let original = STANDARD.decode(fs::read(&path).unwrap()).unwrap();

    // Every fourth byte keeps the Argon2 cost down while covering salt,
    // nonce, ciphertext, and tag.
    for idx in (0..original.len()).step_by(4) {
        let mut tampered = original.clone();
        tampered[idx] ^= 0x40;
        fs::write(&path, STANDARD.encode(&tampered)).unwrap();

        let err = store.get("token").unwrap_err();
        assert!(err.is_integrity_failure(), "byte {idx}: {err:?}");
    }
}

#[test]
fn test_keychain_and_file_tiers_are_separate() {
    let fx = Fixture::new(StoragePreference::Auto);
    let keychain = Arc::new(MemoryKeyring::new());

    let with_keychain = fx.store(keychain.clone(), PASSWORD);
    assert_eq!(with_keychain.tier(), Tier::Keyring);
    with_keychain.set(keys::ANTHROPIC_API_KEY, "sk-ant").unwrap();

    // Same installation, keychain gone: nothing migrates automatically.
    let headless = fx.headless_store(PASSWORD);
    assert!(matches!(
        headless.get(keys::ANTHROPIC_API_KEY),
        Err(SecretError::NotFound(_))
    ));
    assert_eq!(keychain.len(), 1);
}

#[test]
fn test_config_round_trip_drives_store() {
    let fx = Fixture::new(StoragePreference::File);
    let path = fx.home().join("factory.json5");
    fx.config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.secrets, fx.config.secrets);
    assert_eq!(loaded.secrets_dir().unwrap(), fx.secrets_dir());
}

#[cfg(unix)]
#[test]
fn test_on_disk_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let fx = Fixture::new(StoragePreference::File);
    let store = fx.headless_store(PASSWORD);
    store.set("perm", "value").unwrap();

    let dir_mode = fs::metadata(fx.secrets_dir()).unwrap().permissions().mode() & 0o777;
    let file_mode = fs::metadata(fx.secret_file("perm"))
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(dir_mode, 0o700);
    assert_eq!(file_mode, 0o600);
}
