//! Snapshot-based linear undo/redo history.
//!
//! Entries are full immutable snapshots; `index` points at the one that
//! matches the live state. Committing after an undo discards everything
//! beyond `index`.
//!
//! # Usage
//!
//! ```
//! use proedit_timeline::History;
//!
//! let mut history = History::new(50);
//! history.commit(vec![1]);
//! history.commit(vec![1, 2]);
//!
//! let restored = history.undo().cloned();
//! // ... write `restored` back into the live state; commits are ignored here ...
//! history.end_restore();
//! assert_eq!(restored, Some(vec![1]));
//! ```

use proedit_core::defaults::HISTORY_DEPTH;
use tracing::debug;

/// Whether snapshots are currently being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Editing,
    /// An undo/redo snapshot is being written back; commits are suppressed.
    Restoring,
}

#[derive(Debug, Clone)]
pub struct History<S> {
    entries: Vec<S>,
    index: usize,
    max_depth: usize,
    mode: HistoryMode,
}

impl<S: Clone> History<S> {
    /// Create an empty history keeping at most `max_depth` snapshots.
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            max_depth: max_depth.max(1),
            mode: HistoryMode::Editing,
        }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// Record a snapshot of the state after an edit.
    ///
    /// Returns `false` when suppressed because a restore is in progress.
    pub fn commit(&mut self, state: S) -> bool {
        if self.mode == HistoryMode::Restoring {
            debug!("Commit suppressed: restore in progress");
            return false;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(state);
        if self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
        debug!(depth = self.entries.len(), "History entry committed");
        true
    }

    /// Step back one snapshot and enter restore mode.
    ///
    /// The caller writes the returned snapshot into the live state and then
    /// calls [`end_restore`](Self::end_restore).
    pub fn undo(&mut self) -> Option<&S> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.mode = HistoryMode::Restoring;
        debug!(index = self.index, "Undo");
        self.entries.get(self.index)
    }

    /// Step forward one snapshot and enter restore mode.
    pub fn redo(&mut self) -> Option<&S> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.mode = HistoryMode::Restoring;
        debug!(index = self.index, "Redo");
        self.entries.get(self.index)
    }

    /// Leave restore mode; subsequent commits are recorded again.
    pub fn end_restore(&mut self) {
        self.mode = HistoryMode::Editing;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Snapshot matching the live state.
    pub fn current(&self) -> Option<&S> {
        self.entries.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
        self.mode = HistoryMode::Editing;
    }
}

impl<S: Clone> Default for History<S> {
    fn default() -> Self {
        Self::new(HISTORY_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(states: &[i32]) -> History<i32> {
        let mut h = History::new(100);
        for s in states {
            h.commit(*s);
        }
        h
    }

    fn undo(h: &mut History<i32>) -> Option<i32> {
        let s = h.undo().copied();
        h.end_restore();
        s
    }

    fn redo(h: &mut History<i32>) -> Option<i32> {
        let s = h.redo().copied();
        h.end_restore();
        s
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut h = history_with(&[0, 1, 2, 3]);
        assert_eq!(undo(&mut h), Some(2));
        assert_eq!(undo(&mut h), Some(1));
        assert_eq!(undo(&mut h), Some(0));
        assert_eq!(undo(&mut h), None);
        assert!(!h.can_undo());

        assert_eq!(redo(&mut h), Some(1));
        assert_eq!(redo(&mut h), Some(2));
        assert_eq!(redo(&mut h), Some(3));
        assert_eq!(redo(&mut h), None);
        assert_eq!(h.current(), Some(&3));
    }

    #[test]
    fn test_new_commit_discards_redo() {
        let mut h = history_with(&[0, 1, 2]);
        undo(&mut h);
        undo(&mut h);
        assert!(h.can_redo());
        h.commit(10);
        assert!(!h.can_redo());
        assert_eq!(h.len(), 2);
        assert_eq!(undo(&mut h), Some(0));
    }

    #[test]
    fn test_commit_suppressed_while_restoring() {
        let mut h = history_with(&[0, 1]);
        h.undo();
        assert_eq!(h.mode(), HistoryMode::Restoring);
        assert!(!h.commit(99));
        h.end_restore();
        assert_eq!(h.len(), 2);
        assert!(h.can_redo());
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut h = History::new(3);
        for i in 0..5 {
            h.commit(i);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(undo(&mut h), Some(3));
        assert_eq!(undo(&mut h), Some(2));
        assert_eq!(undo(&mut h), None);
    }

    #[test]
    fn test_empty_history_boundaries() {
        let mut h: History<i32> = History::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.undo().is_none());
        assert_eq!(h.mode(), HistoryMode::Editing);
    }
}
