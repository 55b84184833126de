// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Context injection for outbound prompts.
//!
//! The completion endpoint is stateless, so prior turns of a slot are replayed
//! inside the message text itself. Only a bounded suffix of the joined history
//! is sent, and only once a slot has more than one prior prompt.
//!
//! The trim window counts Unicode scalar values (`char`s), not bytes, so the
//! cut never lands inside a multi-byte character.

#[cfg(feature = "telemetry")]
use std::time::Instant;

#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::GLOBAL_METRICS;

/// Default trim window, in characters.
pub const DEFAULT_CONTEXT_WINDOW: usize = 1000;

/// Instruction placed in front of the replayed history.
pub const CONTEXT_PREAMBLE: &str =
    "Use this Context but do not respond to it, only write the answer to the prompt:\n";

/// Separator between the replayed history and the new prompt.
pub const PROMPT_MARKER: &str = "\nPrompt:\n";

/// Minimum number of prior prompts before any context is injected.
const MIN_HISTORY_FOR_CONTEXT: usize = 2;

/// Builds the exact text sent to the completion endpoint for one user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBuilder {
    window: usize,
}

impl ContextBuilder {
    /// Create a builder with the given trim window (in characters).
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// The trim window in characters.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Whether a slot with `prior_len` earlier prompts gets context injected.
    pub fn injects_context(prior_len: usize) -> bool {
        prior_len >= MIN_HISTORY_FOR_CONTEXT
    }

    /// Build the outbound message for `new_text` given the slot's earlier prompts.
    ///
    /// `prior_history` must not include `new_text` itself.
    pub fn build(&self, new_text: &str, prior_history: &[String]) -> String {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        if !Self::injects_context(prior_history.len()) {
            return new_text.to_string();
        }

        let joined = prior_history.join("\n");
        let context = trailing_chars(&joined, self.window);

        let mut message = String::with_capacity(
            CONTEXT_PREAMBLE.len() + context.len() + PROMPT_MARKER.len() + new_text.len(),
        );
        message.push_str(CONTEXT_PREAMBLE);
        message.push_str(context);
        message.push_str(PROMPT_MARKER);
        message.push_str(new_text);

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.context.build", start.elapsed());

        message
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

/// Return the last `limit` characters of `text`.
pub fn trailing_chars(text: &str, limit: usize) -> &str {
    let total = text.chars().count();
    if total <= limit {
        return text;
    }
    let skip = total - limit;
    match text.char_indices().nth(skip) {
        Some((offset, _)) => &text[offset..],
        None => "",
    }
}
