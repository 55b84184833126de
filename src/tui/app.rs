// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session controller.
//!
//! Owns the slot store, the prompt box and the log pane, and reacts to one
//! [`Event`] at a time. Completion requests run on background tasks and come
//! back through the same event queue.

use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info, warn};

use crate::config::ResolvedConfig;
use crate::dispatch::{CompletionEvent, CompletionResult, RequestDispatcher, SlotKey};
use crate::session::{ContextBuilder, RecallDirection, SessionStore, SLOT_COUNT};

use super::components::{TextInput, Viewport};
use super::events::{Event, EventHandler};
use super::ui;

/// Direction for moving the active slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

/// Per-position runtime state that travels with a slot when it is moved.
#[derive(Debug, Clone, Copy)]
struct SlotRuntime {
    key: SlotKey,
    in_flight: usize,
}

/// The session controller.
pub struct App {
    store: SessionStore,
    active_slot: usize,
    input: TextInput,
    viewport: Viewport,
    /// Coins billed since the process started.
    cumulative_usage: f64,
    runtime: [SlotRuntime; SLOT_COUNT],
    /// Last persistence failure, cleared by the next successful save.
    last_error: Option<String>,
    should_quit: bool,
    context: ContextBuilder,
    dispatcher: RequestDispatcher,
}

impl App {
    /// Create a controller over a loaded store.
    pub fn new(store: SessionStore, config: &ResolvedConfig, dispatcher: RequestDispatcher) -> Self {
        let runtime = std::array::from_fn(|i| SlotRuntime {
            key: SlotKey(i as u64),
            in_flight: 0,
        });

        let mut app = Self {
            store,
            active_slot: 0,
            input: TextInput::new(),
            viewport: Viewport::default(),
            cumulative_usage: 0.0,
            runtime,
            last_error: None,
            should_quit: false,
            context: ContextBuilder::new(config.context_window),
            dispatcher,
        };
        app.refresh_placeholder();
        app.refresh_log();
        app
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Index of the slot being shown and edited.
    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn cumulative_usage(&self) -> f64 {
        self.cumulative_usage
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn model(&self) -> &str {
        self.dispatcher.model()
    }

    /// Number of outstanding requests for the slot at `index`.
    pub fn in_flight(&self, index: usize) -> usize {
        self.runtime[index].in_flight
    }

    /// Whether the slot at `index` is waiting for at least one response.
    pub fn is_awaiting(&self, index: usize) -> bool {
        self.in_flight(index) > 0
    }

    /// Text shown in the empty prompt box.
    pub fn placeholder(&self) -> String {
        let lead = if self.is_awaiting(self.active_slot) {
            format!("Waiting for {}...", self.model())
        } else {
            format!("Ask the LLM... ({})", self.model())
        };
        format!(
            "{} | {:3.0}% | {}/{} | {:.2} coins",
            lead,
            self.viewport.scroll_percent() * 100.0,
            self.active_slot + 1,
            SLOT_COUNT,
            self.cumulative_usage
        )
    }

    /// Summary printed after the interface closes.
    pub fn usage_summary(&self) -> String {
        format!("Spent {:.2} coins this session", self.cumulative_usage)
    }

    /// Run the event loop until the user quits.
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut events: EventHandler,
    ) -> io::Result<()> {
        let size = terminal.size()?;
        self.resize(size.width, size.height);

        while !self.should_quit {
            terminal.draw(|f| ui::draw(f, self))?;

            match events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        Ok(())
    }

    /// Handle one event. Every event is fully applied before this returns.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => {}
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.resize(w, h),
            Event::Completion(completion) => self.apply_completion(completion),
        }
        self.refresh_placeholder();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Enter => self.submit(),
            KeyCode::F(n @ 1..=9) => self.select_slot(usize::from(n) - 1),
            KeyCode::Left if ctrl || alt => self.move_active(MoveDirection::Left),
            KeyCode::Right if ctrl || alt => self.move_active(MoveDirection::Right),
            KeyCode::Char('n') if ctrl => self.reset_active(),
            KeyCode::Char('l') if ctrl => self.recall(RecallDirection::ResetToEnd),
            KeyCode::Up => self.recall(RecallDirection::Backward),
            KeyCode::Down => self.recall(RecallDirection::Forward),
            KeyCode::PageUp => self.viewport.page_up(),
            KeyCode::PageDown => self.viewport.page_down(),
            KeyCode::Home => self.viewport.goto_top(),
            KeyCode::End => self.viewport.goto_bottom(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Char(c) if !ctrl && !alt => self.input.insert_char(c),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.viewport.handle_mouse(&mouse);
    }

    /// Apply new terminal dimensions to the prompt box and log pane.
    pub fn resize(&mut self, width: u16, height: u16) {
        let sizes = ui::pane_sizes(width, height, self.input.height());
        self.input.set_width(sizes.input_width);
        self.viewport.set_size(sizes.log_width, sizes.log_height);
        self.refresh_log();
        self.viewport.goto_bottom();
        debug!(width, height, "Resized");
    }

    /// Send the prompt box contents from the active slot.
    pub fn submit(&mut self) {
        if self.input.is_blank() {
            self.input.reset();
            return;
        }

        let text = self.input.take();
        let index = self.active_slot;

        let message = {
            let slot = self.store.slot_mut(index);
            let message = self.context.build(&text, &slot.prompt_history);
            slot.append_user_turn(&text);
            // Up after sending starts from the newest prompt.
            slot.recall(RecallDirection::ResetToEnd);
            message
        };

        info!(
            slot = index,
            text_len = text.chars().count(),
            message_len = message.chars().count(),
            with_context = message.len() != text.len(),
            "Submitting prompt"
        );

        self.runtime[index].in_flight += 1;
        self.persist();
        self.refresh_log();
        self.viewport.goto_bottom();

        self.dispatcher.dispatch(self.runtime[index].key, index, message);
    }

    /// Apply a finished request to the slot that sent it, wherever it is now.
    pub fn apply_completion(&mut self, event: CompletionEvent) {
        let Some(index) = self.position_of(event.slot_key) else {
            warn!(key = ?event.slot_key, "Completion for an unknown slot, dropping");
            return;
        };

        let runtime = &mut self.runtime[index];
        runtime.in_flight = runtime.in_flight.saturating_sub(1);

        match event.result {
            CompletionResult::Success { text, cost } => {
                info!(slot = index, cost, "Completion applied");
                self.store.slot_mut(index).append_assistant_turn(&text);
                self.cumulative_usage += cost;
            }
            CompletionResult::Failure { description } => {
                info!(slot = index, error = %description, "Completion failed");
                self.store.slot_mut(index).append_error_turn(&description);
            }
        }

        if index == self.active_slot {
            self.refresh_log();
            self.viewport.goto_bottom();
        }
        self.persist();
    }

    /// Show slot `index`. Requests in flight for other slots are unaffected.
    pub fn select_slot(&mut self, index: usize) {
        if index >= SLOT_COUNT {
            return;
        }
        self.active_slot = index;
        self.refresh_log();
        self.viewport.goto_bottom();
        debug!(slot = index, "Selected slot");
    }

    /// Swap the active slot with its neighbour and follow it.
    pub fn move_active(&mut self, direction: MoveDirection) {
        let from = self.active_slot;
        let to = match direction {
            MoveDirection::Left => from.checked_sub(1),
            MoveDirection::Right => Some(from + 1).filter(|&i| i < SLOT_COUNT),
        };
        let Some(to) = to else {
            return;
        };

        self.store.swap_adjacent(from, to);
        self.runtime.swap(from, to);
        self.active_slot = to;
        info!(from, to, "Moved slot");

        self.persist();
        self.refresh_log();
    }

    /// Clear the active slot.
    pub fn reset_active(&mut self) {
        let index = self.active_slot;
        self.store.reset_slot(index);
        self.input.reset();
        info!(slot = index, "Reset slot");

        self.persist();
        self.refresh_log();
        self.viewport.goto_top();
    }

    fn recall(&mut self, direction: RecallDirection) {
        let text = self.store.slot_mut(self.active_slot).recall(direction);
        self.input.set_value(&text);
    }

    fn position_of(&self, key: SlotKey) -> Option<usize> {
        self.runtime.iter().position(|r| r.key == key)
    }

    fn persist(&mut self) {
        match self.store.save() {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!(error = %e, "Failed to save conversations");
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn refresh_log(&mut self) {
        let lines = ui::log_lines(self.store.slot(self.active_slot));
        self.viewport.set_content(lines);
    }

    fn refresh_placeholder(&mut self) {
        let placeholder = self.placeholder();
        self.input.set_placeholder(placeholder);
    }
}
