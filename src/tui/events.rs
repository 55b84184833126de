// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The single event queue feeding the session controller.
//!
//! Terminal input and finished completion requests arrive on the same
//! channel and are handled strictly in arrival order.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::dispatch::CompletionEvent;

/// Everything the controller reacts to.
#[derive(Debug, Clone)]
pub enum Event {
    /// A tick event for periodic redraws.
    Tick,
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal resize event.
    Resize(u16, u16),
    /// A completion request finished.
    Completion(CompletionEvent),
}

/// Event handler that polls for terminal events.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate in milliseconds.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        tokio::spawn(async move {
            let mut ticker = interval(tick_rate);

            loop {
                let event = tokio::select! {
                    _ = ticker.tick() => Event::Tick,
                    event = poll_event() => event,
                };

                if tx_clone.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for injecting events from background tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Get the next event, if available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Poll for a crossterm event.
async fn poll_event() -> Event {
    loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            if let Ok(event) = event::read() {
                match event {
                    // Windows reports releases too.
                    CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                        return Event::Key(key)
                    }
                    CrosstermEvent::Mouse(mouse) => return Event::Mouse(mouse),
                    CrosstermEvent::Resize(w, h) => return Event::Resize(w, h),
                    _ => continue,
                }
            }
        }
        tokio::task::yield_now().await;
    }
}
