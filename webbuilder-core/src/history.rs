//! Snapshot-based undo/redo.
//!
//! The undo stack holds documents that have already been shown, oldest
//! first; its top is always the document currently on screen. Undo moves
//! the top onto the redo stack and reveals the entry below it, so the
//! bottom entry is never itself undone.

use std::collections::VecDeque;

use crate::CanvasElement;

/// Default bound on the number of undo entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A full copy of the document.
pub type Snapshot = Vec<CanvasElement>;

/// Undo and redo stacks of document snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    /// Oldest first; back is the current document.
    undo_stack: VecDeque<Snapshot>,
    /// Most recent undo first.
    redo_stack: VecDeque<Snapshot>,
    /// Maximum undo depth.
    limit: usize,
}

impl History {
    /// Start a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    /// Start a history with a custom bound (at least one entry).
    #[must_use]
    pub fn with_limit(initial: Snapshot, limit: usize) -> Self {
        let mut undo_stack = VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT) + 1);
        undo_stack.push_back(initial);
        Self {
            undo_stack,
            redo_stack: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record the document as it is after a mutation.
    ///
    /// Evicts the oldest entry beyond the limit and invalidates redo.
    pub fn checkpoint(&mut self, elements: &[CanvasElement]) {
        self.undo_stack.push_back(elements.to_vec());
        self.trim();
        self.redo_stack.clear();
    }

    /// Step back one checkpoint and return the document to display.
    ///
    /// Returns `None` when only the initial entry is left.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let top = self.undo_stack.pop_back()?;
        self.redo_stack.push_front(top);
        self.undo_stack.back().cloned()
    }

    /// Re-apply the most recently undone checkpoint.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let next = self.redo_stack.pop_front()?;
        self.undo_stack.push_back(next);
        self.trim();
        self.undo_stack.back().cloned()
    }

    /// Drop all entries and start over from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.undo_stack.clear();
        self.undo_stack.push_back(initial);
        self.redo_stack.clear();
    }

    /// The snapshot on top of the undo stack.
    #[must_use]
    pub fn current(&self) -> Option<&[CanvasElement]> {
        self.undo_stack.back().map(Vec::as_slice)
    }

    /// Whether [`History::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Whether [`History::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries on the undo stack, including the current one.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries on the redo stack.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum undo depth.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    fn trim(&mut self) {
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Snapshot::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(contents: &[&str]) -> Snapshot {
        contents
            .iter()
            .map(|c| CanvasElement::new("p").with_content(*c))
            .collect()
    }

    #[test]
    fn test_new_history_cannot_undo_or_redo() {
        let mut history = History::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_undo_reveals_previous_checkpoint() {
        let mut history = History::default();
        let one = doc(&["a"]);
        let two = doc(&["a", "b"]);
        history.checkpoint(&one);
        history.checkpoint(&two);

        assert_eq!(history.undo(), Some(one.clone()));
        assert_eq!(history.undo(), Some(Snapshot::new()));
        assert!(history.undo().is_none());

        assert_eq!(history.redo(), Some(one));
        assert_eq!(history.redo(), Some(two));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut history = History::default();
        history.checkpoint(&doc(&["a"]));
        history.undo();
        assert!(history.can_redo());

        history.checkpoint(&doc(&["b"]));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::with_limit(Snapshot::new(), 3);
        for i in 0..5 {
            history.checkpoint(&doc(&[&i.to_string()]));
        }
        assert_eq!(history.undo_depth(), 3);

        let mut undo_count = 0;
        while history.undo().is_some() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 2);
        let oldest = history.current().expect("bottom entry");
        assert_eq!(oldest[0].content.as_deref(), Some("2"));
    }

    #[test]
    fn test_reset_starts_over() {
        let mut history = History::default();
        history.checkpoint(&doc(&["a"]));
        history.reset(doc(&["loaded"]));
        assert!(!history.can_undo());
        assert_eq!(history.undo_depth(), 1);
    }
}
