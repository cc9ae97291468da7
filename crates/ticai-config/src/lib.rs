//! TicAI configuration system.
//!
//! TOML-based configuration for conversation limits, the request rate
//! window, the completion service, storage, and logging. All sections use
//! defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{TicaiConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_store_path, load_from_path};

use std::path::Path;
use ticai_common::ConfigError;

/// Load and validate config.
///
/// Reads `path` when given, otherwise the platform default location
/// (created from the template if missing).
pub fn load_config(path: Option<&Path>) -> Result<TicaiConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TicaiConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
