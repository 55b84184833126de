// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! TUI components module.
//!
//! The prompt box and the scrollable conversation pane.

pub mod text_input;
pub mod viewport;

pub use text_input::{TextInput, TextInputWidget, DEFAULT_CHAR_LIMIT, DEFAULT_INPUT_HEIGHT};
pub use viewport::{wrap_text, StyledLine, Viewport, ViewportWidget, MOUSE_WHEEL_DELTA};

/// Snapshot testing utilities for TUI components.
#[cfg(test)]
pub mod testing {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// Create a test terminal for snapshot testing.
    pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }
}
