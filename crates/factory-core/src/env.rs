//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name).map(|v| parse_bool(&v)).unwrap_or(false)
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Common environment variable names.
pub mod vars {
    /// Factory home directory override.
    pub const FACTORY_HOME: &str = "FACTORY_HOME";

    /// Factory config file override.
    pub const FACTORY_CONFIG: &str = "FACTORY_CONFIG";

    /// Password for the encrypted-file secret tier.
    pub const FACTORY_SECRETS_PASSWORD: &str = "FACTORY_SECRETS_PASSWORD";

    /// Disable OS keychain probing and force the encrypted-file tier.
    pub const FACTORY_NO_KEYRING: &str = "FACTORY_NO_KEYRING";
}
