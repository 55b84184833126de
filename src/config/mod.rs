// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module for the Straico client.
//!
//! Handles loading and merging of configuration from multiple sources:
//! - Config file: `<config dir>/straico-cli/config.json` (or `.yaml`/`.yml`)
//! - Environment: `STRAICO_API_KEY`, `STRAICO_MODEL`
//! - CLI options: command-line arguments
//!
//! Configuration is merged with precedence (CLI > env > file > defaults).

mod loader;
mod merger;
mod types;

// Re-export public types
pub use loader::{
    config_write_path, find_config_file, get_config_dir, load_config_file, load_config_from,
    load_user_config, save_config_file, update_config_in, update_user_config, CONFIG_DIR_NAME,
    CONFIG_FILES,
};

pub use merger::{default_config, merge_config, CliOptions};

pub use types::{ConfigFile, ResolvedConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

use std::path::Path;

use crate::error::ConfigError;

/// Load and merge all configuration sources.
///
/// This is the main entry point for configuration loading.
pub fn load_config(cli_options: CliOptions) -> Result<ResolvedConfig, ConfigError> {
    let file = load_user_config()?;
    Ok(merge_config(file, cli_options))
}

/// Like [`load_config`], reading the config file from `dir`.
pub fn load_config_in(dir: &Path, cli_options: CliOptions) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_from(dir)?;
    Ok(merge_config(file, cli_options))
}

/// Return the API key or an error telling the user how to set one.
pub fn require_api_key(config: &ResolvedConfig) -> Result<&str, ConfigError> {
    config.api_key.as_deref().ok_or_else(|| {
        ConfigError::MissingField(
            "API key. Run `straico config set-key <KEY>` or set STRAICO_API_KEY".to_string(),
        )
    })
}
