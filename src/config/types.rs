// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the on-disk config file and the resolved configuration handed to
//! the session controller, supporting JSON and YAML formats.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_CONTEXT_WINDOW;

/// Default model when nothing else is configured.
pub const DEFAULT_MODEL: &str = "anthropic/claude-3-haiku:beta";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.straico.com";

/// Per-user configuration file.
/// Lives in the platform config directory as config.json or config.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// API key used as the bearer credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Model identifier to chat with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Custom base URL for the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Trim window for replayed history, in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<usize>,

    /// Upper bound on generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// File links attached to every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_urls: Option<Vec<String>>,

    /// YouTube links attached to every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_urls: Option<Vec<String>>,
}

/// Fully resolved configuration after merging all sources.
///
/// Read-only for the lifetime of a session.
#[derive(Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub context_window: usize,
    pub max_tokens: Option<u32>,
    pub file_urls: Vec<String>,
    pub youtube_urls: Vec<String>,
    /// Overrides the default session file location.
    pub sessions_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// The key with everything but the last four characters masked.
    pub fn redacted_key(&self) -> Option<String> {
        self.api_key.as_deref().map(redact)
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            context_window: DEFAULT_CONTEXT_WINDOW,
            max_tokens: None,
            file_urls: Vec::new(),
            youtube_urls: Vec::new(),
            sessions_file: None,
        }
    }
}

// Hand-written so the key never reaches a log line.
impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_key", &self.redacted_key())
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("context_window", &self.context_window)
            .field("max_tokens", &self.max_tokens)
            .field("file_urls", &self.file_urls)
            .field("youtube_urls", &self.youtube_urls)
            .field("sessions_file", &self.sessions_file)
            .finish()
    }
}

fn redact(key: &str) -> String {
    let total = key.chars().count();
    if total <= 4 {
        return "*".repeat(total);
    }
    let tail: String = key.chars().skip(total - 4).collect();
    format!("{}{}", "*".repeat(total - 4), tail)
}
