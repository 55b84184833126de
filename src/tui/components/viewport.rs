// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Scrollable text pane, wrapped by display width.
//!
//! Content is set as logical lines with a style each. The viewport wraps
//! them to its width and tracks a vertical offset in wrapped rows.

use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Rows moved per mouse wheel notch.
pub const MOUSE_WHEEL_DELTA: usize = 3;

/// One logical line of content.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledLine {
    pub text: String,
    pub style: Style,
}

impl StyledLine {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }
}

/// A scrollable text pane.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    y_offset: usize,
    content: Vec<StyledLine>,
    rows: Vec<StyledLine>,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    /// Number of wrapped rows.
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Resize and re-wrap the current content.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.rewrap();
    }

    /// Replace the content and re-wrap it.
    pub fn set_content(&mut self, content: Vec<StyledLine>) {
        self.content = content;
        self.rewrap();
    }

    fn rewrap(&mut self) {
        self.rows = self
            .content
            .iter()
            .flat_map(|line| {
                wrap_text(&line.text, self.width)
                    .into_iter()
                    .map(move |row| StyledLine::new(row, line.style))
            })
            .collect();
        self.y_offset = self.y_offset.min(self.max_y_offset());
    }

    fn max_y_offset(&self) -> usize {
        self.rows.len().saturating_sub(self.height as usize)
    }

    pub fn at_top(&self) -> bool {
        self.y_offset == 0
    }

    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    pub fn line_up(&mut self, n: usize) {
        self.y_offset = self.y_offset.saturating_sub(n);
    }

    pub fn line_down(&mut self, n: usize) {
        self.y_offset = (self.y_offset + n).min(self.max_y_offset());
    }

    pub fn page_up(&mut self) {
        self.line_up(self.height.max(1) as usize);
    }

    pub fn page_down(&mut self) {
        self.line_down(self.height.max(1) as usize);
    }

    /// Scroll position in `0.0..=1.0`. Content that fits counts as fully scrolled.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_y_offset();
        if max == 0 {
            return 1.0;
        }
        (self.y_offset as f64 / max as f64).clamp(0.0, 1.0)
    }

    /// Apply a mouse wheel event. Returns whether it was a scroll.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.line_up(MOUSE_WHEEL_DELTA);
                true
            }
            MouseEventKind::ScrollDown => {
                self.line_down(MOUSE_WHEEL_DELTA);
                true
            }
            _ => false,
        }
    }

    /// Rows currently in view.
    pub fn visible_rows(&self) -> &[StyledLine] {
        let start = self.y_offset.min(self.rows.len());
        let end = (start + self.height as usize).min(self.rows.len());
        &self.rows[start..end]
    }
}

/// Break `text` into rows of at most `width` display columns.
///
/// Embedded newlines start new rows. An empty input yields one empty row.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();

    for segment in text.split('\n') {
        let mut row = String::new();
        let mut col = 0usize;
        for c in segment.chars() {
            let w = c.width().unwrap_or(0);
            if col + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                col = 0;
            }
            row.push(c);
            col += w;
        }
        rows.push(row);
    }

    rows
}

/// Renders the visible part of a [`Viewport`].
pub struct ViewportWidget<'a> {
    viewport: &'a Viewport,
}

impl<'a> ViewportWidget<'a> {
    pub fn new(viewport: &'a Viewport) -> Self {
        Self { viewport }
    }
}

impl Widget for ViewportWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .viewport
            .visible_rows()
            .iter()
            .map(|row| Line::from(Span::styled(row.text.as_str(), row.style)))
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}
