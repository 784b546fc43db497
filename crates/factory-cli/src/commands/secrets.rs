//! Secret management commands.
//!
//! Provides `factory secrets set|get|delete|status` subcommands on top of the
//! tiered store from the `factory-secrets` crate.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use factory_core::{env, Config, SecretString};
use factory_secrets::{AutoStore, SecretError, SecretStore, Tier};
use tracing::debug;

/// Secrets command arguments.
#[derive(Args)]
pub struct SecretsArgs {
    #[command(subcommand)]
    pub command: SecretsCommand,
}

#[derive(clap::Subcommand)]
pub enum SecretsCommand {
    /// Store a secret (prompts for value)
    Set {
        /// Secret name (alphanumeric, underscore, hyphen)
        name: String,

        /// Secret value (if omitted, prompts for hidden input; may be empty)
        #[arg(long)]
        value: Option<String>,
    },

    /// Retrieve and print a secret
    Get {
        /// Secret name
        name: String,
    },

    /// Delete a secret
    Delete {
        /// Secret name
        name: String,
    },

    /// Show which storage tier is active
    Status,
}

/// Password for the encrypted-file tier, from the environment or a prompt.
fn resolve_password() -> factory_secrets::Result<SecretString> {
    if let Some(password) = env::get_var(env::vars::FACTORY_SECRETS_PASSWORD) {
        return Ok(SecretString::new(password));
    }

    let password = SecretString::new(rpassword::prompt_password(
        "Password for encrypted secrets: ",
    )?);
    if password.is_empty() {
        return Err(SecretError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "password must not be empty",
        )));
    }
    Ok(password)
}

/// Value for `secrets set`, from `--value` or a hidden prompt.
///
/// Empty input is stored as an empty secret on both paths.
fn secret_value<P>(name: &str, value: Option<String>, prompt: P) -> anyhow::Result<String>
where
    P: FnOnce(String) -> std::io::Result<String>,
{
    match value {
        Some(v) => Ok(v),
        None => prompt(format!("Enter value for '{name}': ")).context("Failed to read secret"),
    }
}

/// Run a store operation off the async runtime; Argon2 is CPU and memory bound.
async fn blocking<T, F>(op: F) -> anyhow::Result<T>
where
    F: FnOnce() -> factory_secrets::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(op)
        .await
        .context("secret store task panicked")?;
    Ok(result?)
}

/// Run the secrets command.
pub async fn run(args: SecretsArgs, config: &Config) -> anyhow::Result<()> {
    let secrets = config.secrets.clone();
    let dir = config.secrets_dir()?;
    let store = blocking(move || AutoStore::new(&secrets, dir, resolve_password))
        .await
        .context("Failed to initialize secret store")?;
    debug!(tier = %store.tier(), "secret store ready");
    let store = Arc::new(store);

    match args.command {
        SecretsCommand::Set { name, value } => {
            let value = secret_value(&name, value, |prompt| rpassword::prompt_password(prompt))?;

            let s = Arc::clone(&store);
            let n = name.clone();
            blocking(move || s.set(&n, &value)).await?;

            println!("Secret '{}' stored in {}.", name, store.tier());
        }

        SecretsCommand::Get { name } => {
            let s = Arc::clone(&store);
            let n = name.clone();
            match blocking(move || s.get(&n)).await {
                Ok(secret) => println!("{}", secret.expose_secret()),
                Err(e) if is_not_found(&e) => anyhow::bail!("No secret named '{}' is stored", name),
                Err(e) => return Err(e),
            }
        }

        SecretsCommand::Delete { name } => {
            let s = Arc::clone(&store);
            let n = name.clone();
            match blocking(move || s.delete(&n)).await {
                Ok(()) => println!("Secret '{}' deleted.", name),
                Err(e) if is_not_found(&e) => anyhow::bail!("No secret named '{}' is stored", name),
                Err(e) => return Err(e),
            }
        }

        SecretsCommand::Status => {
            println!("Tier:     {}", store.tier());
            match store.tier() {
                Tier::Keyring => {
                    if let Some(keychain) = store.keychain() {
                        println!("Service:  {}", keychain.service());
                    }
                }
                Tier::EncryptedFile => {
                    if let Some(files) = store.file_store() {
                        println!("Location: {}", files.base_dir().display());
                        let names = files.list()?;
                        if names.is_empty() {
                            println!("\nNo secrets stored.");
                        } else {
                            println!();
                            for name in &names {
                                println!("  {name}");
                            }
                            println!("\n{} secret(s) total.", names.len());
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SecretError>()
        .is_some_and(SecretError::is_not_found)
}
