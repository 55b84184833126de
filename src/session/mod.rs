// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversation state: slots, their persistence, and context injection.
//!
//! - **Slot**: one chat thread with its prompt history, rendered log and recall cursor
//! - **Store**: the nine slots and the JSON file they are saved to
//! - **Context**: builds the outbound message, replaying a bounded suffix of history
//!
//! # Example
//!
//! ```rust,ignore
//! use straico::session::{ContextBuilder, SessionStore};
//!
//! let mut store = SessionStore::open("/tmp/conversations.json")?;
//! let prior = store.slot(0).prompt_history.clone();
//! store.slot_mut(0).append_user_turn("how are you");
//! let message = ContextBuilder::default().build("how are you", &prior);
//! store.save()?;
//! ```

pub mod context;
pub mod slot;
pub mod store;

pub use context::{trailing_chars, ContextBuilder, CONTEXT_PREAMBLE, DEFAULT_CONTEXT_WINDOW, PROMPT_MARKER};
pub use slot::{
    ConversationSlot, RecallDirection, TurnKind, ASSISTANT_PREFIX, ERROR_PREFIX, USER_PREFIX,
};
pub use store::{default_sessions_path, SessionStore, SESSIONS_FILE, SLOT_COUNT};
