//! Linear undo/redo history over full state snapshots

use dungeon_core::{DungeonError, DungeonResult, HistoryDirection};
use std::collections::VecDeque;

/// Maximum number of snapshots kept when no preference overrides it
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A bounded, linear list of snapshots with a cursor on the active one.
///
/// `snapshots[index]` is always the current state. Committing after an undo
/// discards everything past the cursor.
#[derive(Debug, Clone)]
pub struct HistoryManager<T> {
    snapshots: VecDeque<T>,
    index: usize,
    limit: usize,
}

impl<T> HistoryManager<T> {
    /// Start a history whose only snapshot is `initial`
    pub fn new(initial: T, limit: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(initial);
        Self {
            snapshots,
            index: 0,
            limit: limit.max(1),
        }
    }

    /// The active snapshot
    pub fn current(&self) -> &T {
        &self.snapshots[self.index]
    }

    /// Record a new state, truncating any redo branch and evicting the
    /// oldest snapshot once the bound is exceeded
    pub fn commit(&mut self, state: T) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(state);
        self.index += 1;
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
            self.index -= 1;
        }
    }

    /// Step back one snapshot
    pub fn undo(&mut self) -> DungeonResult<&T> {
        if self.index == 0 {
            return Err(DungeonError::HistoryBoundary(HistoryDirection::Undo));
        }
        self.index -= 1;
        Ok(self.current())
    }

    /// Step forward one snapshot
    pub fn redo(&mut self) -> DungeonResult<&T> {
        if self.index + 1 >= self.snapshots.len() {
            return Err(DungeonError::HistoryBoundary(HistoryDirection::Redo));
        }
        self.index += 1;
        Ok(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Drop all snapshots and start over from `state`
    pub fn reset(&mut self, state: T) {
        self.snapshots.clear();
        self.snapshots.push_back(state);
        self.index = 0;
    }

    /// Change the bound, evicting the oldest snapshots if needed
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        while self.snapshots.len() > self.limit {
            if self.index == 0 {
                self.snapshots.pop_back();
            } else {
                self.snapshots.pop_front();
                self.index -= 1;
            }
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
