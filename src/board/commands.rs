//! Command interpreter.
//!
//! Maps discrete input commands onto board operations against the focused
//! column. Execution is pure: the returned [`Outcome`] lists the preference
//! values that changed, the sync request of a committed move and the link to
//! open, and the caller carries those out. Commands that cannot apply (moving
//! from an empty column, undo with no history) are ignored.
use std::sync::Arc;

use super::moves::SyncRequest;
use super::types::{Direction, SortMode, Status};
use super::{Board, BoardState};

/// An input event, already decoded from the keyboard or pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FocusLeft,
    FocusRight,
    CursorUp,
    CursorDown,
    MoveLeft,
    MoveRight,
    Open,
    Undo,
    Redo,
    Reset,
    ToggleSort,
    /// Pointer-style selection: focus `column` and put its cursor on `key`.
    Select { column: Status, key: String },
}

/// A persisted preference value that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefChange {
    Focus(Status),
    SortMode(SortMode),
    Cursor(Status, Option<Arc<str>>),
}

/// Side effects requested by one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Preference values to persist before the command is considered done.
    pub changes: Vec<PrefChange>,
    /// Status notification for a newly committed move.
    pub sync: Option<SyncRequest>,
    /// Link to hand to the opener.
    pub open: Option<Arc<str>>,
    /// Short human-readable description for the status bar.
    pub message: Option<String>,
}

impl Outcome {
    /// True if the command had no effect at all.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.sync.is_none() && self.open.is_none()
    }
}

/// Preference values that differ between two snapshots.
fn diff(before: &BoardState, after: &BoardState) -> Vec<PrefChange> {
    let mut changes = Vec::new();
    if before.focus != after.focus {
        changes.push(PrefChange::Focus(after.focus));
    }
    if before.sort_mode != after.sort_mode {
        changes.push(PrefChange::SortMode(after.sort_mode));
    }
    for column in Status::ALL {
        let i = column.index();
        if before.cursors[i] != after.cursors[i] {
            changes.push(PrefChange::Cursor(column, after.cursors[i].clone()));
        }
    }
    changes
}

impl Board {
    /// Run one command against the board.
    pub fn execute(&mut self, command: Command) -> Outcome {
        let before = self.state();
        let mut outcome = Outcome::default();

        match command {
            Command::FocusLeft => self.set_focus(self.focus.left()),
            Command::FocusRight => self.set_focus(self.focus.right()),
            Command::CursorUp => self.advance_cursor(self.focus, Direction::Up),
            Command::CursorDown => self.advance_cursor(self.focus, Direction::Down),
            Command::MoveLeft => self.move_selected(self.focus.left(), &mut outcome),
            Command::MoveRight => self.move_selected(self.focus.right(), &mut outcome),
            Command::Open => {
                outcome.open = self.selected(self.focus).map(|a| Arc::clone(&a.link));
            }
            Command::Undo => {
                outcome.message = Some(match self.undo() {
                    Some(record) => format!("Undid move to {}", record.to),
                    None => "Nothing to undo".to_string(),
                });
            }
            Command::Redo => {
                outcome.message = Some(match self.redo() {
                    Some(record) => format!("Redid move to {}", record.to),
                    None => "Nothing to redo".to_string(),
                });
            }
            Command::Reset => self.reset_cursors(),
            Command::ToggleSort => {
                let mode = self.toggle_sort();
                outcome.message = Some(format!("Sorted by {}", mode.name()));
            }
            Command::Select { column, key } => match self.select(column, &key) {
                Ok(()) => self.set_focus(column),
                Err(e) => tracing::debug!(error = %e, "Ignoring selection"),
            },
        }

        outcome.changes = diff(&before, &self.state());
        outcome
    }

    /// Move the focused column's selected article to `to`, then put the
    /// vacated column's cursor on the article that followed it (or preceded
    /// it, if it was last) in the pre-move order.
    fn move_selected(&mut self, to: Status, outcome: &mut Outcome) {
        let from = self.focus;
        let order = self.ordered_keys(from);
        let Some(pos) = self.cursors.position_in(from, &order) else {
            return;
        };
        let key = order[pos].to_string();
        let replacement = order
            .get(pos + 1)
            .or_else(|| pos.checked_sub(1).and_then(|p| order.get(p)))
            .map(|k| k.to_string());

        match self.move_article(&key, from, to) {
            Ok(request) => {
                if let Some(next) = replacement {
                    self.cursors.set_unchecked(from, Some(&next));
                    self.repair(from);
                }
                outcome.sync = Some(request);
                outcome.message = Some(format!("Moved to {to}"));
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring move"),
        }
    }
}
