// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use std::path::PathBuf;

use super::types::{ConfigFile, ResolvedConfig};

/// CLI options that can override configuration.
///
/// Environment variables are folded in here by clap, so they share the
/// precedence of the flag they back.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub context_window: Option<usize>,
    pub max_tokens: Option<u32>,
    pub file_urls: Vec<String>,
    pub youtube_urls: Vec<String>,
    pub sessions_file: Option<PathBuf>,
}

/// Default configuration values.
pub fn default_config() -> ResolvedConfig {
    ResolvedConfig::default()
}

/// Merge the config file and CLI options.
///
/// Precedence (highest to lowest):
/// 1. CLI options (and their environment variables)
/// 2. Config file
/// 3. Default values
pub fn merge_config(file: Option<ConfigFile>, cli: CliOptions) -> ResolvedConfig {
    let mut result = default_config();

    if let Some(config) = file {
        apply_config_file(&mut result, config);
    }

    // Apply CLI options (highest precedence)
    apply_cli_options(&mut result, cli);

    result
}

fn apply_config_file(result: &mut ResolvedConfig, config: ConfigFile) {
    if let Some(key) = non_blank(config.key) {
        result.api_key = Some(key);
    }

    if let Some(model) = non_blank(config.model) {
        result.model = model;
    }

    if let Some(base_url) = non_blank(config.base_url) {
        result.base_url = base_url;
    }

    if let Some(window) = config.context_window {
        result.context_window = window;
    }

    if config.max_tokens.is_some() {
        result.max_tokens = config.max_tokens;
    }

    if let Some(urls) = config.file_urls {
        result.file_urls = urls;
    }

    if let Some(urls) = config.youtube_urls {
        result.youtube_urls = urls;
    }
}

fn apply_cli_options(result: &mut ResolvedConfig, cli: CliOptions) {
    if let Some(key) = non_blank(cli.api_key) {
        result.api_key = Some(key);
    }

    if let Some(model) = non_blank(cli.model) {
        result.model = model;
    }

    if let Some(base_url) = non_blank(cli.base_url) {
        result.base_url = base_url;
    }

    if let Some(window) = cli.context_window {
        result.context_window = window;
    }

    if cli.max_tokens.is_some() {
        result.max_tokens = cli.max_tokens;
    }

    // Links given on the command line replace the configured ones.
    if !cli.file_urls.is_empty() {
        result.file_urls = cli.file_urls;
    }

    if !cli.youtube_urls.is_empty() {
        result.youtube_urls = cli.youtube_urls;
    }

    if cli.sessions_file.is_some() {
        result.sessions_file = cli.sessions_file;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{DEFAULT_BASE_URL, DEFAULT_MODEL};

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_merge_nothing() {
        let config = merge_config(None, CliOptions::default());
        assert_eq!(config, default_config());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = ConfigFile {
            key: Some("file-key".to_string()),
            model: Some("file-model".to_string()),
            context_window: Some(25),
            ..Default::default()
        };

        let config = merge_config(Some(file), CliOptions::default());
        assert_eq!(config.api_key, Some("file-key".to_string()));
        assert_eq!(config.model, "file-model");
        assert_eq!(config.context_window, 25);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ConfigFile {
            key: Some("file-key".to_string()),
            model: Some("file-model".to_string()),
            youtube_urls: Some(vec!["https://youtu.be/file".to_string()]),
            ..Default::default()
        };
        let cli = CliOptions {
            model: Some("cli-model".to_string()),
            youtube_urls: vec!["https://youtu.be/cli".to_string()],
            ..Default::default()
        };

        let config = merge_config(Some(file), cli);
        assert_eq!(config.model, "cli-model"); // CLI wins
        assert_eq!(config.api_key, Some("file-key".to_string()));
        assert_eq!(config.youtube_urls, vec!["https://youtu.be/cli"]);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let file = ConfigFile {
            key: Some("".to_string()),
            model: Some("  ".to_string()),
            ..Default::default()
        };
        let cli = CliOptions {
            api_key: Some(" ".to_string()),
            ..Default::default()
        };

        let config = merge_config(Some(file), cli);
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_cli_lists_keep_file_lists() {
        let file = ConfigFile {
            file_urls: Some(vec!["https://example.com/a.pdf".to_string()]),
            ..Default::default()
        };

        let config = merge_config(Some(file), CliOptions::default());
        assert_eq!(config.file_urls, vec!["https://example.com/a.pdf"]);
    }
}
