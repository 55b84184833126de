// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::session::{ConversationSlot, TurnKind, SLOT_COUNT};

use super::app::App;
use super::components::{StyledLine, TextInputWidget, ViewportWidget};

/// Shown in place of the log while a slot is empty.
pub const WELCOME_TEXT: &str = "Welcome to Straico Chat!
Type a message and press Enter to send.

F1-F9 switch conversations. Ctrl+Left/Right moves the current one.
Up/Down recall earlier prompts, Ctrl+N clears this conversation.
PageUp/PageDown or the mouse wheel scroll. Esc quits.";

/// Height of the status bar.
const STATUS_HEIGHT: u16 = 1;

/// Rows and columns taken by a bordered block.
const BORDER: u16 = 2;

/// Inner sizes of the log pane and the input box for a terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSizes {
    pub log_width: u16,
    pub log_height: u16,
    pub input_width: u16,
}

/// Compute pane sizes the same way [`draw`] lays the screen out.
pub fn pane_sizes(width: u16, height: u16, input_height: u16) -> PaneSizes {
    PaneSizes {
        log_width: width.saturating_sub(BORDER),
        log_height: height
            .saturating_sub(input_height + BORDER)
            .saturating_sub(STATUS_HEIGHT)
            .saturating_sub(BORDER),
        input_width: width.saturating_sub(BORDER),
    }
}

/// Style for one rendered log line.
pub fn turn_style(kind: TurnKind) -> Style {
    match kind {
        TurnKind::User => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        TurnKind::Assistant => Style::default(),
        TurnKind::Error => Style::default().fg(Color::Red),
        TurnKind::Other => Style::default().fg(Color::Gray),
    }
}

/// Lines for the log pane: the slot's messages, or the welcome text.
pub fn log_lines(slot: &ConversationSlot) -> Vec<StyledLine> {
    if slot.messages.is_empty() {
        let style = Style::default().fg(Color::DarkGray);
        return WELCOME_TEXT
            .lines()
            .map(|line| StyledLine::new(line, style))
            .collect();
    }

    slot.messages
        .iter()
        .map(|message| StyledLine::new(message.as_str(), turn_style(TurnKind::of(message))))
        .collect()
}

/// Draw the whole screen.
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                                // Conversation log
            Constraint::Length(app.input().height() + BORDER), // Prompt box
            Constraint::Length(STATUS_HEIGHT),                 // Slot bar
        ])
        .split(f.area());

    draw_log(f, app, chunks[0]);
    draw_input(f, app, chunks[1]);
    draw_status(f, app, chunks[2]);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Conversation {}/{} ", app.active_slot() + 1, SLOT_COUNT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);

    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(ViewportWidget::new(app.viewport()), inner);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.is_awaiting(app.active_slot()) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(area);

    f.render_widget(TextInputWidget::new(app.input()).block(block), area);

    if let Some(position) = app.input().cursor_position(inner) {
        f.set_cursor_position(position);
    }
}

/// Slot numbers with the active one highlighted and pending ones marked,
/// followed by the last save error if there is one.
fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();

    for index in 0..SLOT_COUNT {
        let pending = app.is_awaiting(index);
        let label = if pending {
            format!(" {}* ", index + 1)
        } else {
            format!(" {} ", index + 1)
        };

        let mut style = if app.store().slot(index).is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Gray)
        };
        if pending {
            style = style.fg(Color::Yellow);
        }
        if index == app.active_slot() {
            style = style
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(label, style));
    }

    spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
    match app.last_error() {
        Some(error) => spans.push(Span::styled(
            format!("Save failed: {}", error),
            Style::default().fg(Color::Red),
        )),
        None => spans.push(Span::styled(
            format!("{:.2} coins", app.cumulative_usage()),
            Style::default().fg(Color::DarkGray),
        )),
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_sizes() {
        let sizes = pane_sizes(80, 24, 3);
        assert_eq!(sizes.log_width, 78);
        // 24 - (3 + 2) - 1 - 2
        assert_eq!(sizes.log_height, 16);
        assert_eq!(sizes.input_width, 78);
    }

    #[test]
    fn test_pane_sizes_tiny_terminal() {
        let sizes = pane_sizes(1, 2, 3);
        assert_eq!(sizes.log_width, 0);
        assert_eq!(sizes.log_height, 0);
    }

    #[test]
    fn test_log_lines_welcome_for_empty_slot() {
        let lines = log_lines(&ConversationSlot::new());
        assert_eq!(lines[0].text, "Welcome to Straico Chat!");
        assert_eq!(lines.len(), WELCOME_TEXT.lines().count());
    }

    #[test]
    fn test_log_lines_styles_by_kind() {
        let mut slot = ConversationSlot::new();
        slot.append_user_turn("hi");
        slot.append_assistant_turn("hello");
        slot.append_error_turn("boom");

        let lines = log_lines(&slot);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].style, turn_style(TurnKind::User));
        assert_eq!(lines[1].style, turn_style(TurnKind::Assistant));
        assert_eq!(lines[2].style, turn_style(TurnKind::Error));
        assert_eq!(lines[2].text, "Error: boom");
    }
}
