//! Triage board engine.
//!
//! A `Board` owns every piece of mutable session state: the article catalog,
//! the derived per-column order, the per-column cursors, the undo/redo history,
//! the sort mode and the focused column. It performs no I/O; moves emit a
//! [`SyncRequest`] value and command execution emits preference changes for the
//! caller to persist.
//!
//! # Module Structure
//!
//! - `types` - Status/column, article, move record, sort mode
//! - `catalog` - Article storage with O(1) lookup by link
//! - `sort` - Sort policy deriving each column's order
//! - `cursor` - Per-column selection cursors
//! - `history` - Bounded undo/redo stacks
//! - `moves` - Move/undo/redo state machine
//! - `commands` - Command interpreter
use std::sync::Arc;
use thiserror::Error;

mod catalog;
mod commands;
mod cursor;
mod history;
mod moves;
mod sort;
mod types;

pub use catalog::Catalog;
pub use commands::{Command, Outcome, PrefChange};
pub use cursor::CursorTracker;
pub use history::{History, HISTORY_DEPTH};
pub use moves::SyncRequest;
pub use sort::{compare, order};
pub use types::{Article, Channel, Direction, MoveRecord, SortMode, Status};

// ============================================================================
// Error Types
// ============================================================================

/// Recoverable engine errors. None of them leave partial mutations behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Article not found: {0}")]
    NotFound(String),

    #[error("Cannot move '{key}' from {from} to {to}")]
    InvalidMove { key: String, from: Status, to: Status },

    #[error("Article '{key}' is not in the {column} column")]
    InvalidSelection { key: String, column: Status },
}

// ============================================================================
// Board State Snapshot
// ============================================================================

/// The persisted part of the board: focus, sort mode and cursors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardState {
    pub focus: Status,
    pub sort_mode: SortMode,
    /// Cursor key per column, indexed by `Status::index()`.
    pub cursors: [Option<Arc<str>>; 3],
}

// ============================================================================
// Board
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Board {
    catalog: Catalog,
    /// Catalog positions per column under `sort_mode`.
    orders: [Vec<usize>; 3],
    cursors: CursorTracker,
    history: History,
    sort_mode: SortMode,
    focus: Status,
}

/// Keys of `positions`, in order.
fn keys_of<'a>(catalog: &'a Catalog, positions: &[usize]) -> Vec<&'a str> {
    positions.iter().map(|&p| catalog.at(p).key()).collect()
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board over `articles` with default focus, sort mode and cursors.
    pub fn with_articles(articles: Vec<Article>) -> Self {
        let mut board = Self::new();
        board.ingest(articles);
        board
    }

    /// Replace the catalog for this session.
    ///
    /// History is cleared (its records refer to the previous catalog) and every
    /// cursor is repaired against the new columns. Returns the number of
    /// duplicate links dropped.
    pub fn ingest(&mut self, articles: Vec<Article>) -> usize {
        let duplicates = self.catalog.ingest(articles);
        self.history.clear();
        for column in Status::ALL {
            self.resort(column);
            self.repair(column);
        }
        tracing::info!(
            articles = self.catalog.len(),
            fresh = self.orders[Status::Fresh.index()].len(),
            saved = self.orders[Status::Saved.index()].len(),
            archived = self.orders[Status::Archived.index()].len(),
            "Board loaded"
        );
        duplicates
    }

    /// Apply a stored snapshot. Cursor keys that no longer belong to their
    /// column are repaired rather than rejected.
    pub fn restore(&mut self, state: &BoardState) {
        self.focus = state.focus;
        if self.sort_mode != state.sort_mode {
            self.sort_mode = state.sort_mode;
            self.resort_all();
        }
        for column in Status::ALL {
            self.cursors
                .set_unchecked(column, state.cursors[column.index()].as_deref());
            self.repair(column);
        }
    }

    /// Snapshot of the persisted state.
    pub fn state(&self) -> BoardState {
        BoardState {
            focus: self.focus,
            sort_mode: self.sort_mode,
            cursors: Status::ALL.map(|c| self.cursors.current(c).map(Arc::from)),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn article(&self, key: &str) -> Option<&Article> {
        self.catalog.get(key)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn focus(&self) -> Status {
        self.focus
    }

    pub fn cursor(&self, column: Status) -> Option<&str> {
        self.cursors.current(column)
    }

    /// Number of articles in `column`.
    pub fn len(&self, column: Status) -> usize {
        self.orders[column.index()].len()
    }

    pub fn is_empty(&self, column: Status) -> bool {
        self.orders[column.index()].is_empty()
    }

    /// Articles of `column` in the current sort order.
    ///
    /// The iterator is lazy and `Clone`, so it can be restarted freely.
    pub fn ordered(
        &self,
        column: Status,
    ) -> impl ExactSizeIterator<Item = &Article> + Clone + '_ {
        self.orders[column.index()]
            .iter()
            .map(move |&p| self.catalog.at(p))
    }

    /// Keys of `column` in the current sort order.
    pub fn ordered_keys(&self, column: Status) -> Vec<&str> {
        keys_of(&self.catalog, &self.orders[column.index()])
    }

    /// Article under the cursor of `column`.
    pub fn selected(&self, column: Status) -> Option<&Article> {
        self.cursor(column).and_then(|k| self.catalog.get(k))
    }

    /// Positional index of the cursor within `column`'s current order.
    pub fn selected_index(&self, column: Status) -> Option<usize> {
        let order = keys_of(&self.catalog, &self.orders[column.index()]);
        self.cursors.position_in(column, &order)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn set_focus(&mut self, column: Status) {
        self.focus = column;
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        if self.sort_mode == mode {
            return;
        }
        self.sort_mode = mode;
        self.resort_all();
    }

    pub fn toggle_sort(&mut self) -> SortMode {
        self.set_sort_mode(self.sort_mode.toggle());
        self.sort_mode
    }

    /// Move `column`'s cursor one step, wrapping.
    pub fn advance_cursor(&mut self, column: Status, direction: Direction) {
        let order = keys_of(&self.catalog, &self.orders[column.index()]);
        self.cursors.advance(column, direction, &order);
    }

    /// Point `column`'s cursor directly at `key`.
    ///
    /// # Errors
    ///
    /// `BoardError::InvalidSelection` unless `key` is currently in `column`.
    pub fn select(&mut self, column: Status, key: &str) -> Result<(), BoardError> {
        let order = keys_of(&self.catalog, &self.orders[column.index()]);
        self.cursors.set(column, key, &order)
    }

    /// Point every column's cursor at its first article.
    pub fn reset_cursors(&mut self) {
        for column in Status::ALL {
            let order = keys_of(&self.catalog, &self.orders[column.index()]);
            self.cursors.reset(column, &order);
        }
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn resort(&mut self, column: Status) {
        self.orders[column.index()] = sort::order(&self.catalog, column, self.sort_mode);
    }

    fn resort_all(&mut self) {
        for column in Status::ALL {
            self.resort(column);
        }
    }

    fn repair(&mut self, column: Status) {
        let order = keys_of(&self.catalog, &self.orders[column.index()]);
        self.cursors.repair(column, &order);
    }

    /// Re-derive order, then cursors, for the two columns a move touched.
    fn refresh_columns(&mut self, a: Status, b: Status) {
        for column in [a, b] {
            self.resort(column);
            self.repair(column);
        }
    }
}

// ============================================================================
// Test Fixtures
// ============================================================================
