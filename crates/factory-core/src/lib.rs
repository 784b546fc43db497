//! # factory-core
//!
//! Core configuration and utilities shared by the Factory crates.
//!
//! - **Configuration**: loading and saving `~/.factory/factory.json5`
//! - **Paths**: resolution of the Factory home and secrets directories
//! - **Secrets**: [`SecretString`] and the well-known secret names in [`keys`]

pub mod config;
pub mod env;
pub mod error;
pub mod keys;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
pub use secret::SecretString;
