//! Aria configuration system.
//!
//! Provides TOML-based configuration with live reload and full
//! validation. All config sections use defaults so partial configs
//! work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aria_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use reload::ReloadManager;
pub use schema::{AriaConfig, CONFIG_SCHEMA_VERSION};
pub use watcher::ConfigWatcher;

use aria_common::ConfigError;
use std::path::Path;

/// Load and validate config from `path`, or from the platform default
/// path (created from a template if missing) when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<AriaConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &AriaConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
