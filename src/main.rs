// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! straico entry point: CLI, one-shot prompts and the chat interface.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, Level};

use straico::cli::{self, Commands};
use straico::config::{self, CliOptions, ResolvedConfig};
use straico::dispatch::{request_completion, CompletionResult, DispatchSettings, RequestDispatcher};
use straico::providers::create_provider;
use straico::session::{default_sessions_path, SessionStore};
use straico::telemetry::{default_log_path, init_telemetry, TelemetryConfig, TelemetryGuard};
use straico::tui::{self, App, EventHandler};

/// Chat with Straico models from the terminal.
#[derive(Parser)]
#[command(name = "straico")]
#[command(author, version, about = "Chat with Straico models from the terminal", long_about = None)]
struct Cli {
    /// Model to use
    #[arg(short, long, env = "STRAICO_MODEL")]
    model: Option<String>,

    /// Straico API key
    #[arg(long, env = "STRAICO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL for the API
    #[arg(long)]
    base_url: Option<String>,

    /// Characters of earlier prompts replayed with each message
    #[arg(long, value_name = "CHARS")]
    context_window: Option<usize>,

    /// Upper bound on generated tokens
    #[arg(long)]
    max_tokens: Option<u32>,

    /// File link to attach to every request (repeatable)
    #[arg(long = "file-url", value_name = "URL")]
    file_urls: Vec<String>,

    /// YouTube link to attach to every request (repeatable)
    #[arg(long = "youtube-url", value_name = "URL")]
    youtube_urls: Vec<String>,

    /// Use this conversations file instead of the default
    #[arg(long, value_name = "PATH")]
    sessions_file: Option<PathBuf>,

    /// Send a single prompt, print the answer and exit
    #[arg(short = 'P', long)]
    prompt: Option<String>,

    /// Show debug output
    #[arg(long)]
    debug: bool,

    /// Show trace output (full payloads)
    #[arg(long)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn log_level(&self) -> Option<Level> {
        if self.trace {
            Some(Level::TRACE)
        } else if self.debug {
            Some(Level::DEBUG)
        } else {
            None
        }
    }

    fn cli_options(&mut self) -> CliOptions {
        CliOptions {
            api_key: self.api_key.take(),
            model: self.model.take(),
            base_url: self.base_url.take(),
            context_window: self.context_window,
            max_tokens: self.max_tokens,
            file_urls: std::mem::take(&mut self.file_urls),
            youtube_urls: std::mem::take(&mut self.youtube_urls),
            sessions_file: self.sessions_file.take(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let interactive = cli.command.is_none() && cli.prompt.is_none();
    let _guard = init_tracing(interactive, cli.log_level())?;

    let resolved = config::load_config(cli.cli_options()).context("Failed to load configuration")?;
    debug!(config = ?resolved, "Resolved configuration");

    if let Some(command) = cli.command.take() {
        return cli::execute(command, &resolved).await;
    }

    if let Some(prompt) = cli.prompt.take() {
        return handle_prompt(&resolved, prompt).await;
    }

    run_chat(&resolved).await
}

fn init_tracing(interactive: bool, level: Option<Level>) -> anyhow::Result<TelemetryGuard> {
    let mut telemetry = match (interactive, default_log_path()) {
        (true, Some(path)) => TelemetryConfig::interactive(path),
        // Nowhere to write: keep stderr quiet so the UI is not garbled.
        (true, None) => TelemetryConfig::command_line().with_level(Level::ERROR),
        (false, _) => TelemetryConfig::command_line(),
    };
    if let Some(level) = level {
        telemetry = telemetry.with_level(level);
    }
    init_telemetry(&telemetry).context("Failed to initialize logging")
}

/// One-shot mode: send the prompt as is and print the answer.
async fn handle_prompt(config: &ResolvedConfig, prompt: String) -> anyhow::Result<()> {
    let settings = DispatchSettings::from_config(config)?;
    let provider = create_provider(config)?;

    let spinner = io::stderr().is_terminal().then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Waiting for {}...", settings.model));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });

    let result = request_completion(provider.as_ref(), &settings, prompt).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        CompletionResult::Success { text, cost } => {
            println!("{}", text);
            debug!(cost, "One-shot prompt finished");
            Ok(())
        }
        CompletionResult::Failure { description } => {
            eprintln!("{} {}", "Error:".red().bold(), description);
            std::process::exit(1);
        }
    }
}

/// Interactive mode: the nine-slot chat interface.
async fn run_chat(config: &ResolvedConfig) -> anyhow::Result<()> {
    let settings = DispatchSettings::from_config(config)?;
    let provider = create_provider(config)?;

    let path = match &config.sessions_file {
        Some(path) => path.clone(),
        None => default_sessions_path()?,
    };
    let store = SessionStore::open(&path)
        .with_context(|| format!("Failed to load conversations from {}", path.display()))?;
    info!(path = %path.display(), model = %settings.model, "Starting chat");

    let events = EventHandler::new(tui::TICK_RATE_MS);
    let dispatcher = RequestDispatcher::new(provider, settings, events.sender());
    let mut app = App::new(store, config, dispatcher);

    tui::run(&mut app, events).await.context("Terminal error")?;

    println!("{}", app.usage_summary());

    #[cfg(feature = "telemetry")]
    debug!(
        "Session metrics:\n{}",
        straico::telemetry::GLOBAL_METRICS.snapshot().format_report()
    );

    Ok(())
}
