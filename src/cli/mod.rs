// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Non-interactive subcommands.

pub mod config;
pub mod models;

use clap::{Subcommand, ValueEnum};

use crate::config::ResolvedConfig;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Subcommands for straico.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the chat models the API offers
    #[command(aliases = &["ls"])]
    Models {
        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Config subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the resolved configuration, key redacted
    Show,
    /// Save the API key
    SetKey {
        /// Straico API key
        key: String,
    },
    /// Save the default model
    SetModel {
        /// Model identifier, e.g. openai/gpt-4o-mini
        model: String,
    },
    /// Show where config, conversations and logs are kept
    Path,
}

/// Run a subcommand against the resolved configuration.
pub async fn execute(command: Commands, resolved: &ResolvedConfig) -> anyhow::Result<()> {
    match command {
        Commands::Models { format } => models::run(resolved, format).await,
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                config::show(resolved);
                Ok(())
            }
            ConfigAction::SetKey { key } => config::set_key(&key),
            ConfigAction::SetModel { model } => config::set_model(&model),
            ConfigAction::Path => config::paths(resolved),
        },
    }
}
