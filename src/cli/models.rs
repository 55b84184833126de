// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! `straico models`: the chat model catalogue.

use anyhow::Context;
use colored::Colorize;

use crate::config::{require_api_key, ResolvedConfig};
use crate::providers::{create_provider, ChatModel, CompletionProvider};

use super::OutputFormat;

/// Fetch the catalogue and print it.
pub async fn run(config: &ResolvedConfig, format: OutputFormat) -> anyhow::Result<()> {
    let api_key = require_api_key(config)?;
    let provider = create_provider(config)?;

    let models = fetch_models(provider.as_ref(), api_key).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&models)?),
        OutputFormat::Text => {
            println!("{}", "Available chat models".bright_blue().bold());
            for model in &models {
                println!();
                println!("{}", model.name.bright_white().bold());
                println!("{}", format_details(model));
            }
            if models.is_empty() {
                println!("{}", "The API returned no chat models".dimmed());
            }
        }
    }
    Ok(())
}

/// Ask the provider for its chat models.
pub async fn fetch_models(
    provider: &dyn CompletionProvider,
    api_key: &str,
) -> anyhow::Result<Vec<ChatModel>> {
    provider
        .list_models(api_key.to_string())
        .await
        .context("Failed to list models")
}

/// The indented lines printed under a model's name.
pub fn format_details(model: &ChatModel) -> String {
    let mut lines = vec![
        format!("\tModel: {}", model.id),
        format!(
            "\tPricing: {} coins per {} words",
            model.pricing.coins, model.pricing.words
        ),
    ];
    if model.max_output > 0 {
        lines.push(format!("\tMax output: {} tokens", model.max_output));
    }
    lines.join("\n")
}
