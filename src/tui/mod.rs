// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Terminal User Interface for straico.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                  │
//! │  (nine slots, active slot, prompt box, log pane, usage)     │
//! └─────────────────────────────────────────────────────────────┘
//!          ▲                 │                 │
//!          │                 ▼                 ▼
//! ┌─────────────────┐ ┌─────────────┐ ┌─────────────────────┐
//! │     Events      │ │     UI      │ │  RequestDispatcher  │
//! │ (keys, results) │ │  (Render)   │ │  (background tasks) │
//! └─────────────────┘ └─────────────┘ └─────────────────────┘
//!          ▲                                   │
//!          └───────────── Completion ──────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use straico::tui::{self, App, EventHandler};
//!
//! let events = EventHandler::new(tui::TICK_RATE_MS);
//! let dispatcher = RequestDispatcher::new(provider, settings, events.sender());
//! let mut app = App::new(store, &config, dispatcher);
//! tui::run(&mut app, events).await?;
//! ```

pub mod app;
pub mod components;
pub mod events;
pub mod ui;

pub use app::{App, MoveDirection};
pub use events::{Event, EventHandler};

use std::io::{self, IsTerminal};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

/// Tick interval for the event loop, in milliseconds.
pub const TICK_RATE_MS: u64 = 250;

/// Initialize the terminal for TUI mode.
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "No TTY available. The chat interface needs an interactive terminal; use --prompt for scripted use.",
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application until the user quits.
///
/// `events` must be the handler whose sender was given to the app's dispatcher.
pub async fn run(app: &mut App, events: EventHandler) -> io::Result<()> {
    let mut terminal = init_terminal()?;

    let result = app.run(&mut terminal, events).await;

    restore_terminal(&mut terminal)?;
    result
}
