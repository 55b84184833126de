// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Editable prompt box.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Default maximum number of characters in the prompt.
pub const DEFAULT_CHAR_LIMIT: usize = 2000;

/// Default number of visible rows.
pub const DEFAULT_INPUT_HEIGHT: u16 = 3;

/// Multi-row text input with a character cursor and a placeholder.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars, `0..=value.chars().count()`.
    cursor: usize,
    placeholder: String,
    char_limit: usize,
    width: u16,
    height: u16,
    focused: bool,
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: String::new(),
            char_limit: DEFAULT_CHAR_LIMIT,
            width: 0,
            height: DEFAULT_INPUT_HEIGHT,
            focused: true,
        }
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_limit(&self) -> usize {
        self.char_limit
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height.max(1);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether the buffer holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Replace the buffer, truncated to the char limit, and move the cursor to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.char_limit).collect();
        self.cursor = self.value.chars().count();
    }

    /// Clear the buffer.
    pub fn reset(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the buffer contents, leaving it empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the cursor. Ignored once the limit is reached.
    pub fn insert_char(&mut self, c: char) {
        if self.value.chars().count() >= self.char_limit {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Insert as much of `text` as fits.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Split the value into rows no wider than `width` columns.
    ///
    /// Also returns the (row, column) of the cursor.
    fn layout(&self, width: u16) -> (Vec<String>, (usize, u16)) {
        let width = width.max(1);
        let mut rows = vec![String::new()];
        let mut col: u16 = 0;
        let mut cursor_pos = (0, 0);

        for (i, c) in self.value.chars().enumerate() {
            if i == self.cursor {
                cursor_pos = (rows.len() - 1, col);
            }
            if c == '\n' {
                rows.push(String::new());
                col = 0;
                continue;
            }
            let w = c.width().unwrap_or(0) as u16;
            if col + w > width {
                rows.push(String::new());
                col = 0;
                if i == self.cursor {
                    cursor_pos = (rows.len() - 1, 0);
                }
            }
            if let Some(row) = rows.last_mut() {
                row.push(c);
            }
            col += w;
        }

        if self.cursor >= self.value.chars().count() {
            if col >= width {
                rows.push(String::new());
                col = 0;
            }
            cursor_pos = (rows.len() - 1, col);
        }

        (rows, cursor_pos)
    }

    /// First row shown so that the cursor stays visible.
    fn scroll_top(&self, cursor_row: usize, visible: u16) -> usize {
        (cursor_row + 1).saturating_sub(visible.max(1) as usize)
    }

    /// Terminal position of the cursor when rendered into `area`.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        if !self.focused || area.width == 0 || area.height == 0 {
            return None;
        }
        let (_, (row, col)) = self.layout(area.width);
        let top = self.scroll_top(row, area.height);
        let y = area.y + (row - top) as u16;
        let x = area.x + col.min(area.width.saturating_sub(1));
        Some(Position::new(x, y))
    }
}

/// Renders a [`TextInput`] into an area, optionally inside a block.
pub struct TextInputWidget<'a> {
    input: &'a TextInput,
    block: Option<Block<'a>>,
}

impl<'a> TextInputWidget<'a> {
    pub fn new(input: &'a TextInput) -> Self {
        Self { input, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.input.value.is_empty() {
            let placeholder = Line::from(Span::styled(
                self.input.placeholder.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            Paragraph::new(placeholder).render(inner, buf);
            return;
        }

        let (rows, (cursor_row, _)) = self.input.layout(inner.width);
        let top = self.input.scroll_top(cursor_row, inner.height);
        let lines: Vec<Line> = rows
            .into_iter()
            .skip(top)
            .take(inner.height as usize)
            .map(Line::from)
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
