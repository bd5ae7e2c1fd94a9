//! Linear undo/redo history over scene snapshots.

use crate::scene::Snapshot;
use serde::{Deserialize, Serialize};

/// When intermediate gesture states reach history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Every scene mutation is its own undo step, including each pointer move
    /// of a drag or resize.
    #[default]
    Granular,
    /// Intermediate gesture updates are applied to the scene but only the
    /// final state is committed when the gesture ends.
    Coalesced,
}

/// An ordered list of snapshots plus a cursor.
///
/// The cursor is `-1` for an empty history and otherwise points at the entry
/// matching the current scene. Committing drops everything after the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: isize,
    max_entries: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
            max_entries: None,
        }
    }

    /// Keep at most `max` entries, dropping the oldest first.
    pub fn with_limit(max: Option<usize>) -> Self {
        Self {
            max_entries: max.map(|m| m.max(1)),
            ..Self::new()
        }
    }

    /// Append `snapshot` after the cursor, discarding any redo branch.
    pub fn commit(&mut self, snapshot: Snapshot) {
        let keep = (self.cursor + 1) as usize;
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() as isize - 1;

        if let Some(max) = self.max_entries {
            let overflow = self.entries.len().saturating_sub(max);
            if overflow > 0 {
                self.entries.drain(..overflow);
                self.cursor -= overflow as isize;
            }
        }
        log::debug!("History commit: {} entries, cursor {}", self.entries.len(), self.cursor);
    }

    /// Step back one entry. Does nothing when the cursor is at the first entry or empty.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.cursor <= 0 {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward one entry. Does nothing at the newest entry.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.cursor >= self.entries.len() as isize - 1 {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Entry the cursor points at.
    pub fn current(&self) -> Option<Snapshot> {
        usize::try_from(self.cursor)
            .ok()
            .and_then(|i| self.entries.get(i))
            .cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len() as isize - 1
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = -1;
    }
}
