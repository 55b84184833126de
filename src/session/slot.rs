// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A single conversation slot.

use serde::{Deserialize, Serialize};

/// Prefix of a rendered user turn.
pub const USER_PREFIX: &str = "You: ";
/// Prefix of a rendered assistant turn.
pub const ASSISTANT_PREFIX: &str = "LLM: ";
/// Prefix of a rendered error turn.
pub const ERROR_PREFIX: &str = "Error: ";

/// Direction for browsing a slot's prompt history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallDirection {
    /// Toward older entries.
    Backward,
    /// Toward the blank line past the newest entry.
    Forward,
    /// Jump to the end and return the newest entry.
    ResetToEnd,
}

/// Kind of a rendered log line, derived from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    User,
    Assistant,
    Error,
    Other,
}

impl TurnKind {
    /// Classify a rendered message line.
    pub fn of(line: &str) -> Self {
        if line.starts_with(USER_PREFIX) {
            Self::User
        } else if line.starts_with(ASSISTANT_PREFIX) {
            Self::Assistant
        } else if line.starts_with(ERROR_PREFIX) {
            Self::Error
        } else {
            Self::Other
        }
    }

    /// The prefix for this kind, if any.
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Self::User => Some(USER_PREFIX),
            Self::Assistant => Some(ASSISTANT_PREFIX),
            Self::Error => Some(ERROR_PREFIX),
            Self::Other => None,
        }
    }
}

/// One independent chat thread.
///
/// `prompt_history` holds the raw prompts the user submitted, `messages` the
/// rendered log shown on screen. The recall cursor is runtime-only state and
/// starts out unset, which is treated as "end of history".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSlot {
    /// Raw user prompts, oldest first.
    #[serde(default)]
    pub prompt_history: Vec<String>,
    /// Rendered display lines.
    #[serde(default)]
    pub messages: Vec<String>,
    /// Position of the history browser. `None` until first used.
    #[serde(skip)]
    recall_cursor: Option<usize>,
}

impl ConversationSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot from persisted content.
    pub fn with_content(prompt_history: Vec<String>, messages: Vec<String>) -> Self {
        Self {
            prompt_history,
            messages,
            recall_cursor: None,
        }
    }

    /// Current recall cursor, `None` while unset.
    pub fn recall_cursor(&self) -> Option<usize> {
        self.recall_cursor
    }

    /// Whether both the history and the log are empty.
    pub fn is_empty(&self) -> bool {
        self.prompt_history.is_empty() && self.messages.is_empty()
    }

    /// Record a submitted prompt and its log line.
    pub fn append_user_turn(&mut self, text: &str) {
        self.prompt_history.push(text.to_string());
        self.messages.push(format!("{USER_PREFIX}{text}"));
    }

    /// Record an assistant reply.
    pub fn append_assistant_turn(&mut self, text: &str) {
        self.messages.push(format!("{ASSISTANT_PREFIX}{text}"));
    }

    /// Record a failed round-trip. The prompt history is left alone.
    pub fn append_error_turn(&mut self, description: &str) {
        self.messages.push(format!("{ERROR_PREFIX}{description}"));
    }

    /// Clear history and log and unset the recall cursor.
    pub fn reset(&mut self) {
        self.prompt_history.clear();
        self.messages.clear();
        self.recall_cursor = None;
    }

    /// Browse the prompt history, shell style.
    ///
    /// Returns the text that should replace the input buffer. An empty string
    /// means "back to a blank line".
    pub fn recall(&mut self, direction: RecallDirection) -> String {
        if self.prompt_history.is_empty() {
            return String::new();
        }

        let len = self.prompt_history.len();
        let cursor = *self.recall_cursor.get_or_insert(len);

        match direction {
            RecallDirection::ResetToEnd => {
                self.recall_cursor = Some(len);
                self.prompt_history[len - 1].clone()
            }
            RecallDirection::Backward => {
                if cursor == 0 {
                    return self.prompt_history[0].clone();
                }
                let next = cursor - 1;
                self.recall_cursor = Some(next);
                self.prompt_history[next].clone()
            }
            RecallDirection::Forward => {
                let next = cursor + 1;
                if next >= len {
                    self.recall_cursor = Some(len);
                    return String::new();
                }
                self.recall_cursor = Some(next);
                self.prompt_history[next].clone()
            }
        }
    }
}
