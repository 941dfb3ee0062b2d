use std::collections::VecDeque;

use super::types::MoveRecord;

/// Maximum number of undoable moves.
pub const HISTORY_DEPTH: usize = 10;

/// Bounded undo/redo stacks of move records.
///
/// The back of each deque is the top of the stack.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<MoveRecord>,
    redo: VecDeque<MoveRecord>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_depth(HISTORY_DEPTH)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(max_depth + 1),
            redo: VecDeque::with_capacity(max_depth),
            max_depth,
        }
    }

    /// Record a new forward move. Clears redo; evicts the oldest undo entry
    /// when over capacity.
    pub fn record(&mut self, record: MoveRecord) {
        self.redo.clear();
        self.push_undo(record);
    }

    /// Take the most recent move for undoing and park it on the redo stack.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.undo.pop_back()?;
        self.redo.push_back(record.clone());
        Some(record)
    }

    /// Take the most recently undone move and put it back on the undo stack.
    pub fn redo(&mut self) -> Option<MoveRecord> {
        let record = self.redo.pop_back()?;
        self.push_undo(record.clone());
        Some(record)
    }

    fn push_undo(&mut self, record: MoveRecord) {
        self.undo.push_back(record);
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undo stack, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &MoveRecord> {
        self.undo.iter()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
