//! Move/undo engine.
//!
//! `move_article` is the only user-facing way to reclassify an article. It
//! records history and emits a [`SyncRequest`]. `undo` and `redo` replay
//! records straight against the catalog: they never emit sync requests and
//! never record new history.
use std::sync::Arc;

use super::types::{MoveRecord, Status};
use super::{Board, BoardError};

/// Outbound "set this article's status" notification produced by a committed
/// move. Delivery is the caller's concern and never affects board state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub key: Arc<str>,
    pub status: Status,
}

impl Board {
    /// Move `key` from column `from` to column `to`.
    ///
    /// On success the record is pushed on the undo stack (evicting the oldest
    /// beyond the history depth), the redo stack is cleared, both columns are
    /// re-sorted and their cursors repaired.
    ///
    /// # Errors
    ///
    /// - `BoardError::NotFound` if `key` is not in the catalog
    /// - `BoardError::InvalidMove` if `from == to` or `key` is not in `from`
    ///
    /// Nothing changes on error.
    pub fn move_article(
        &mut self,
        key: &str,
        from: Status,
        to: Status,
    ) -> Result<SyncRequest, BoardError> {
        let article = self
            .catalog
            .get(key)
            .ok_or_else(|| BoardError::NotFound(key.to_string()))?;
        if from == to || article.status != from {
            return Err(BoardError::InvalidMove {
                key: key.to_string(),
                from,
                to,
            });
        }
        let key = Arc::clone(&article.link);

        self.catalog.set_status(&key, to)?;
        self.history.record(MoveRecord {
            key: Arc::clone(&key),
            from,
            to,
        });
        self.refresh_columns(from, to);

        tracing::debug!(key = %key, %from, %to, "Article moved");
        Ok(SyncRequest { key, status: to })
    }

    /// Revert the most recent move. Returns the undone record, or `None` if
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.undo()?;
        self.replay(&record.inverse());
        tracing::debug!(key = %record.key, from = %record.to, to = %record.from, "Move undone");
        Some(record)
    }

    /// Re-apply the most recently undone move. Returns the redone record, or
    /// `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<MoveRecord> {
        let record = self.history.redo()?;
        self.replay(&record);
        tracing::debug!(key = %record.key, from = %record.from, to = %record.to, "Move redone");
        Some(record)
    }

    /// Apply a history record directly to the catalog.
    fn replay(&mut self, record: &MoveRecord) {
        // History is cleared on ingest, so every recorded key is still present.
        if let Err(e) = self.catalog.set_status(&record.key, record.to) {
            tracing::error!(error = %e, key = %record.key, "History refers to an unknown article");
            return;
        }
        self.refresh_columns(record.from, record.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::testing::article;
    use crate::board::HISTORY_DEPTH;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// A (Fresh), B (Fresh), C (Saved).
    fn abc() -> Board {
        Board::with_articles(vec![
            article("A", Status::Fresh, 300, "s1"),
            article("B", Status::Fresh, 200, "s2"),
            article("C", Status::Saved, 100, "s3"),
        ])
    }

    fn members(board: &Board, column: Status) -> Vec<String> {
        let mut keys: Vec<String> = board
            .catalog()
            .articles_in(column)
            .map(|a| a.key().to_string())
            .collect();
        keys.sort();
        keys
    }

    fn assert_cursor_invariant(board: &Board) {
        for column in Status::ALL {
            match board.cursor(column) {
                Some(key) => assert_eq!(board.catalog().status_of(key), Some(column)),
                None => assert!(board.is_empty(column), "{column} has members but no cursor"),
            }
        }
    }

    #[test]
    fn test_two_moves_then_two_undos() {
        let mut board = abc();

        board.move_article("A", Status::Fresh, Status::Archived).unwrap();
        board.move_article("B", Status::Fresh, Status::Saved).unwrap();

        assert!(members(&board, Status::Fresh).is_empty());
        assert_eq!(members(&board, Status::Saved), vec!["B", "C"]);
        assert_eq!(members(&board, Status::Archived), vec!["A"]);
        assert_eq!(board.history().undo_len(), 2);
        assert_cursor_invariant(&board);

        board.undo().unwrap();
        board.undo().unwrap();

        assert_eq!(members(&board, Status::Fresh), vec!["A", "B"]);
        assert_eq!(members(&board, Status::Saved), vec!["C"]);
        assert!(members(&board, Status::Archived).is_empty());
        assert_eq!(board.history().redo_len(), 2);
        assert_cursor_invariant(&board);
    }

    #[test]
    fn test_move_same_column_is_invalid() {
        let mut board = abc();
        let before = board.state();

        let err = board
            .move_article("A", Status::Fresh, Status::Fresh)
            .unwrap_err();
        assert!(matches!(err, BoardError::InvalidMove { .. }));
        assert_eq!(board.state(), before);
        assert_eq!(board.catalog().status_of("A"), Some(Status::Fresh));
        assert_eq!(board.history().undo_len(), 0);
    }

    #[test]
    fn test_move_from_wrong_column_is_invalid() {
        let mut board = abc();
        let err = board
            .move_article("C", Status::Fresh, Status::Archived)
            .unwrap_err();
        assert!(matches!(err, BoardError::InvalidMove { .. }));
        assert_eq!(board.catalog().status_of("C"), Some(Status::Saved));
    }

    #[test]
    fn test_move_unknown_key_is_not_found() {
        let mut board = abc();
        let err = board
            .move_article("nope", Status::Fresh, Status::Saved)
            .unwrap_err();
        assert_eq!(err, BoardError::NotFound("nope".to_string()));
    }

    #[test]
    fn test_move_emits_sync_request() {
        let mut board = abc();
        let request = board.move_article("B", Status::Fresh, Status::Saved).unwrap();
        assert_eq!(&*request.key, "B");
        assert_eq!(request.status, Status::Saved);
    }

    #[test]
    fn test_move_repairs_vacated_cursor() {
        let mut board = abc();
        assert_eq!(board.cursor(Status::Fresh), Some("A"));

        board.move_article("A", Status::Fresh, Status::Archived).unwrap();
        assert_eq!(board.cursor(Status::Fresh), Some("B"));
        assert_eq!(board.cursor(Status::Archived), Some("A"));
    }

    #[test]
    fn test_redo_after_undo_restores_post_move_state() {
        let mut board = abc();
        board.move_article("A", Status::Fresh, Status::Saved).unwrap();
        let after_move: Vec<_> = Status::ALL.map(|c| members(&board, c)).into();

        board.undo();
        let redone = board.redo().unwrap();

        assert_eq!(redone.to, Status::Saved);
        let now: Vec<_> = Status::ALL.map(|c| members(&board, c)).into();
        assert_eq!(now, after_move);
        assert_eq!(board.history().undo_len(), 1);
        assert_eq!(board.history().redo_len(), 0);
    }

    #[test]
    fn test_new_move_clears_redo() {
        let mut board = abc();
        board.move_article("A", Status::Fresh, Status::Saved).unwrap();
        board.undo();
        assert_eq!(board.history().redo_len(), 1);

        board.move_article("B", Status::Fresh, Status::Archived).unwrap();
        assert_eq!(board.history().redo_len(), 0);
        assert!(board.redo().is_none());
        assert_eq!(board.catalog().status_of("A"), Some(Status::Fresh));
    }

    #[test]
    fn test_undo_and_redo_on_empty_history_are_noops() {
        let mut board = abc();
        let before = board.state();
        assert!(board.undo().is_none());
        assert!(board.redo().is_none());
        assert_eq!(board.state(), before);
    }

    #[test]
    fn test_history_depth_bounded() {
        let mut board = abc();
        let mut column = Status::Fresh;
        for _ in 0..HISTORY_DEPTH + 1 {
            let next = column.right();
            board.move_article("A", column, next).unwrap();
            column = next;
        }
        assert_eq!(board.history().undo_len(), HISTORY_DEPTH);

        for _ in 0..HISTORY_DEPTH {
            assert!(board.undo().is_some());
        }
        assert!(board.undo().is_none());
        // The first move was evicted, so A ends one step right of Fresh.
        assert_eq!(board.catalog().status_of("A"), Some(Status::Saved));
    }

    fn arb_moves() -> impl Strategy<Value = Vec<(usize, bool)>> {
        prop::collection::vec((0usize..5, any::<bool>()), 0..HISTORY_DEPTH)
    }

    fn five() -> Board {
        Board::with_articles(
            (0..5)
                .map(|i| {
                    let status = Status::ALL[i % 3];
                    article(&format!("k{i}"), status, i as i64 * 10, "s")
                })
                .collect(),
        )
    }

    proptest! {
        #[test]
        fn prop_n_moves_then_n_undos_restores_statuses(moves in arb_moves()) {
            let mut board = five();
            let original: Vec<_> = board.catalog().iter().map(|a| a.status).collect();

            let mut committed = 0;
            for (i, rightward) in moves {
                let key = format!("k{i}");
                let from = board.catalog().status_of(&key).unwrap();
                let to = if rightward { from.right() } else { from.left() };
                board.move_article(&key, from, to).unwrap();
                committed += 1;
                assert_cursor_invariant(&board);
            }
            for _ in 0..committed {
                prop_assert!(board.undo().is_some());
                assert_cursor_invariant(&board);
            }

            let restored: Vec<_> = board.catalog().iter().map(|a| a.status).collect();
            prop_assert_eq!(restored, original);
            prop_assert_eq!(board.history().redo_len(), committed);
        }
    }
}
