use std::sync::Arc;

use super::types::{Direction, Status};
use super::BoardError;

// ============================================================================
// Column Cursor Tracker
// ============================================================================

/// Selected article per column, stored by key.
///
/// Cursors hold article keys rather than positions, so they survive re-sorts.
/// Every method that needs positional context takes the column's current
/// order (`order`) as a slice of keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CursorTracker {
    cursors: [Option<Arc<str>>; 3],
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self, column: Status) -> Option<&str> {
        self.cursors[column.index()].as_deref()
    }

    /// Step to the next or previous article, wrapping at both ends.
    ///
    /// No-op on an empty column. A cursor that is not found in `order` is
    /// treated as sitting before the first article.
    pub fn advance(&mut self, column: Status, direction: Direction, order: &[&str]) {
        if order.is_empty() {
            return;
        }
        let len = order.len();
        let next = match (self.position_in(column, order), direction) {
            (Some(i), Direction::Down) => (i + 1) % len,
            (Some(i), Direction::Up) => (i + len - 1) % len,
            (None, _) => 0,
        };
        self.cursors[column.index()] = Some(Arc::from(order[next]));
    }

    /// Point the cursor at `key`.
    ///
    /// # Errors
    ///
    /// `BoardError::InvalidSelection` if `key` is not in `order`; the cursor is
    /// left unchanged.
    pub fn set(&mut self, column: Status, key: &str, order: &[&str]) -> Result<(), BoardError> {
        if !order.contains(&key) {
            return Err(BoardError::InvalidSelection {
                key: key.to_string(),
                column,
            });
        }
        self.cursors[column.index()] = Some(Arc::from(key));
        Ok(())
    }

    /// Overwrite without validation. Callers must follow up with `repair`.
    pub(crate) fn set_unchecked(&mut self, column: Status, key: Option<&str>) {
        self.cursors[column.index()] = key.map(Arc::from);
    }

    /// Drop a stale cursor onto the first article of `order`, or clear it for
    /// an empty column. Valid cursors are left alone.
    ///
    /// Returns true if the cursor changed.
    pub fn repair(&mut self, column: Status, order: &[&str]) -> bool {
        if self.position_in(column, order).is_some() {
            return false;
        }
        let replacement = order.first().map(|k| Arc::<str>::from(*k));
        let slot = &mut self.cursors[column.index()];
        let changed = *slot != replacement;
        *slot = replacement;
        changed
    }

    /// Point the cursor at the first article of `order` (or none).
    pub fn reset(&mut self, column: Status, order: &[&str]) {
        self.cursors[column.index()] = order.first().map(|k| Arc::from(*k));
    }

    /// Positional index of the cursor in `order`.
    pub fn position_in(&self, column: Status, order: &[&str]) -> Option<usize> {
        let current = self.current(column)?;
        order.iter().position(|k| *k == current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn test_advance_wraps_down() {
        let mut cursors = CursorTracker::new();
        cursors.set(Status::Fresh, "c", &ORDER).unwrap();
        cursors.advance(Status::Fresh, Direction::Down, &ORDER);
        assert_eq!(cursors.current(Status::Fresh), Some("a"));
    }

    #[test]
    fn test_advance_wraps_up() {
        let mut cursors = CursorTracker::new();
        cursors.set(Status::Fresh, "a", &ORDER).unwrap();
        cursors.advance(Status::Fresh, Direction::Up, &ORDER);
        assert_eq!(cursors.current(Status::Fresh), Some("c"));
    }

    #[test]
    fn test_advance_on_empty_column_is_noop() {
        let mut cursors = CursorTracker::new();
        cursors.advance(Status::Saved, Direction::Down, &[]);
        assert_eq!(cursors.current(Status::Saved), None);
    }

    #[test]
    fn test_advance_from_none_selects_first() {
        let mut cursors = CursorTracker::new();
        cursors.advance(Status::Fresh, Direction::Up, &ORDER);
        assert_eq!(cursors.current(Status::Fresh), Some("a"));
    }

    #[test]
    fn test_set_rejects_non_member() {
        let mut cursors = CursorTracker::new();
        cursors.set(Status::Fresh, "b", &ORDER).unwrap();

        let err = cursors.set(Status::Fresh, "zzz", &ORDER).unwrap_err();
        assert!(matches!(err, BoardError::InvalidSelection { .. }));
        assert_eq!(cursors.current(Status::Fresh), Some("b"));
    }

    #[test]
    fn test_repair_stale_cursor_falls_back_to_first() {
        let mut cursors = CursorTracker::new();
        cursors.set(Status::Fresh, "b", &ORDER).unwrap();

        assert!(cursors.repair(Status::Fresh, &["a", "c"]));
        assert_eq!(cursors.current(Status::Fresh), Some("a"));
    }

    #[test]
    fn test_repair_keeps_valid_cursor() {
        let mut cursors = CursorTracker::new();
        cursors.set(Status::Fresh, "b", &ORDER).unwrap();

        assert!(!cursors.repair(Status::Fresh, &["c", "b"]));
        assert_eq!(cursors.current(Status::Fresh), Some("b"));
    }

    #[test]
    fn test_repair_empty_column_clears() {
        let mut cursors = CursorTracker::new();
        cursors.set(Status::Archived, "a", &ORDER).unwrap();

        cursors.repair(Status::Archived, &[]);
        assert_eq!(cursors.current(Status::Archived), None);
    }

    #[test]
    fn test_columns_are_independent() {
        let mut cursors = CursorTracker::new();
        cursors.set(Status::Fresh, "a", &ORDER).unwrap();
        cursors.set(Status::Saved, "c", &ORDER).unwrap();
        cursors.advance(Status::Fresh, Direction::Down, &ORDER);

        assert_eq!(cursors.current(Status::Fresh), Some("b"));
        assert_eq!(cursors.current(Status::Saved), Some("c"));
    }
}
