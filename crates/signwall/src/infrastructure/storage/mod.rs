//! Storage infrastructure: configuration persistence.
//!
//! - `config` reads and writes the configuration file (TOML by default, JSON
//!   for legacy `config.json` files) and migrates older schemas.
//! - `mock` holds an in-memory [`ConfigStore`](crate::application::settings::ConfigStore)
//!   for tests.

pub mod config;
pub mod mock;

pub use config::{ConfigError, FileConfigStore};
