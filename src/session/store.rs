// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fixed set of conversation slots persisted to a single JSON file.

use std::io::Write;
use std::path::{Path, PathBuf};
#[cfg(feature = "telemetry")]
use std::time::Instant;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::get_config_dir;
use crate::error::SessionError;

#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::GLOBAL_METRICS;

use super::slot::ConversationSlot;

/// Number of conversation slots. Each maps to one of the F1-F9 hotkeys.
pub const SLOT_COUNT: usize = 9;

/// Session file name inside the config directory.
pub const SESSIONS_FILE: &str = "conversations.json";

/// Default location of the session file.
pub fn default_sessions_path() -> Result<PathBuf, SessionError> {
    get_config_dir()
        .map(|dir| dir.join(SESSIONS_FILE))
        .ok_or(SessionError::NoDataDir)
}

/// The nine conversation slots and the file they live in.
#[derive(Debug, Clone)]
pub struct SessionStore {
    slots: [ConversationSlot; SLOT_COUNT],
    path: PathBuf,
}

impl SessionStore {
    /// Create a store with empty slots backed by `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            slots: std::array::from_fn(|_| ConversationSlot::new()),
            path: path.into(),
        }
    }

    /// Create a store at `path` and load it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All slots in display order.
    pub fn slots(&self) -> &[ConversationSlot; SLOT_COUNT] {
        &self.slots
    }

    /// Borrow slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SLOT_COUNT`.
    pub fn slot(&self, index: usize) -> &ConversationSlot {
        &self.slots[index]
    }

    /// Mutably borrow slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SLOT_COUNT`.
    pub fn slot_mut(&mut self, index: usize) -> &mut ConversationSlot {
        &mut self.slots[index]
    }

    /// Replace the in-memory slots with the file contents.
    ///
    /// A missing file leaves the current slots untouched.
    pub fn load(&mut self) -> Result<(), SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No session file, starting empty");
                return Ok(());
            }
            Err(e) => return Err(SessionError::io(&self.path, e)),
        };

        let slots: Vec<ConversationSlot> =
            serde_json::from_str(&content).map_err(|e| SessionError::Corrupted {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let found = slots.len();
        self.slots = slots.try_into().map_err(|_| SessionError::SlotCount {
            path: self.path.display().to_string(),
            found,
            expected: SLOT_COUNT,
        })?;

        info!(path = %self.path.display(), "Loaded conversation slots");
        Ok(())
    }

    /// Write all slots to disk.
    ///
    /// The JSON is written to a temporary file in the same directory and then
    /// renamed over the target, so readers see either the old or the new file.
    pub fn save(&self) -> Result<(), SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let content = serde_json::to_string_pretty(&self.slots)
            .map_err(|e| SessionError::Serialize(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| SessionError::io(&dir, e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| SessionError::io(&dir, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| SessionError::io(tmp.path(), e))?;
        tmp.persist(&self.path).map_err(|e| SessionError::Persist {
            path: self.path.display().to_string(),
            message: e.error.to_string(),
        })?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.store.save", start.elapsed());

        debug!(path = %self.path.display(), "Saved conversation slots");
        Ok(())
    }

    /// Exchange the contents of two slots.
    ///
    /// Callers pass adjacent, in-range indices; that is not checked in release builds.
    pub fn swap_adjacent(&mut self, i: usize, j: usize) {
        debug_assert!(i.abs_diff(j) == 1, "swap_adjacent called with {i} and {j}");
        self.slots.swap(i, j);
    }

    /// Reset slot `index` to empty.
    pub fn reset_slot(&mut self, index: usize) {
        self.slots[index].reset();
    }
}
