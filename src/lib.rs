// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! straico - a terminal chat client for the Straico completion API.
//!
//! Nine persistent conversation slots, each with its own prompt history,
//! share one full-screen interface. Requests run in the background and their
//! results land in the slot that sent them, even after switching or moving
//! slots.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`error`] - Error types and result aliases
//! - [`config`] - Configuration loading and merging
//! - [`session`] - Conversation slots, the slot store and context injection
//! - [`providers`] - The completion provider trait and the Straico HTTP client
//! - [`dispatch`] - Background completion requests and their results
//! - [`tui`] - The session controller and its ratatui rendering
//! - [`telemetry`] - Tracing setup and in-process metrics
//! - [`cli`] - Non-interactive subcommands
//!
//! # Example
//!
//! ```rust,ignore
//! use straico::config::{load_config, CliOptions};
//! use straico::session::{default_sessions_path, SessionStore};
//!
//! let config = load_config(CliOptions::default())?;
//! let store = SessionStore::open(default_sessions_path()?)?;
//! ```

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod providers;
pub mod session;
pub mod telemetry;
pub mod tui;

// Re-export commonly used types at crate root
pub use config::{CliOptions, ResolvedConfig};
pub use dispatch::{CompletionEvent, CompletionResult, RequestDispatcher, SlotKey};
pub use error::{ConfigError, ProviderError, Result, SessionError};
pub use providers::{create_provider, CompletionProvider, SharedProvider, StraicoProvider};
pub use session::{ContextBuilder, ConversationSlot, RecallDirection, SessionStore, SLOT_COUNT};

/// straico version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
