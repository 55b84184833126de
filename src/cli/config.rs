// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! `straico config`: inspect and edit the saved configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;

use crate::config::{
    config_write_path, find_config_file, get_config_dir, update_config_in, update_user_config,
    ResolvedConfig,
};
use crate::error::ConfigError;
use crate::session::default_sessions_path;
use crate::telemetry::default_log_path;

/// Print the resolved configuration with the key redacted.
pub fn show(config: &ResolvedConfig) {
    println!("{}", "Current configuration".bright_blue().bold());
    for (label, value) in describe(config) {
        println!("{:<16}{}", format!("{}:", label), value.bright_white());
    }
}

/// Label/value pairs for [`show`].
pub fn describe(config: &ResolvedConfig) -> Vec<(&'static str, String)> {
    let list = |urls: &[String]| {
        if urls.is_empty() {
            "(none)".to_string()
        } else {
            urls.join(", ")
        }
    };

    vec![
        (
            "API key",
            config
                .redacted_key()
                .unwrap_or_else(|| "(not set)".to_string()),
        ),
        ("Model", config.model.clone()),
        ("Base URL", config.base_url.clone()),
        ("Context window", format!("{} chars", config.context_window)),
        (
            "Max tokens",
            config
                .max_tokens
                .map(|n| n.to_string())
                .unwrap_or_else(|| "(model default)".to_string()),
        ),
        ("File URLs", list(&config.file_urls)),
        ("YouTube URLs", list(&config.youtube_urls)),
    ]
}

/// Save the API key to the user config file.
pub fn set_key(key: &str) -> anyhow::Result<()> {
    let key = non_blank(key, "key")?;
    let path = update_user_config(|c| c.key = Some(key)).context("Failed to save API key")?;
    println!("{} API key saved to {}", "✓".green(), path.display());
    Ok(())
}

/// Save the default model to the user config file.
pub fn set_model(model: &str) -> anyhow::Result<()> {
    let model = non_blank(model, "model")?;
    let path = update_user_config(|c| c.model = Some(model.clone())).context("Failed to save model")?;
    println!("{} Default model set to {} in {}", "✓".green(), model, path.display());
    Ok(())
}

/// Like [`set_key`], writing into `dir`.
pub fn set_key_in(dir: &Path, key: &str) -> Result<PathBuf, ConfigError> {
    let key = non_blank(key, "key")?;
    update_config_in(dir, |c| c.key = Some(key))
}

/// Like [`set_model`], writing into `dir`.
pub fn set_model_in(dir: &Path, model: &str) -> Result<PathBuf, ConfigError> {
    let model = non_blank(model, "model")?;
    update_config_in(dir, |c| c.model = Some(model))
}

/// Print where configuration, conversations and logs live.
pub fn paths(config: &ResolvedConfig) -> anyhow::Result<()> {
    let dir = get_config_dir().ok_or(ConfigError::NoConfigDir)?;
    let config_file = find_config_file(&dir).unwrap_or_else(|| config_write_path(&dir));
    let sessions = match &config.sessions_file {
        Some(path) => path.clone(),
        None => default_sessions_path()?,
    };

    println!("{:<16}{}", "Config:", config_file.display());
    println!("{:<16}{}", "Conversations:", sessions.display());
    if let Some(log) = default_log_path() {
        println!("{:<16}{}", "Log:", log.display());
    }
    Ok(())
}

fn non_blank(value: &str, field: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
