//! Integration tests for a triage session: load, move, undo, redo.
//!
//! Articles come in through the wire decoder, so these tests exercise the
//! same path as a real session minus the terminal.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use triage::board::{Board, BoardError, Command, SortMode, Status};
use triage::net::decode_articles;

fn record(link: &str, status: &str, published: &str, source: &str) -> serde_json::Value {
    serde_json::json!({
        "link": link,
        "title": format!("Post {link}"),
        "published": published,
        "summary": "",
        "image": "",
        "read_status": status,
        "channel": {
            "title": "Channel",
            "icon": "",
            "rss_url": source,
            "dominant_color": "#336699",
        },
    })
}

/// A and B fresh, C saved; A is the newest.
fn abc_board() -> Board {
    let body = serde_json::to_vec(&serde_json::json!([
        record("https://a.example/1", "Fresh", "2024-03-01T12:00:00Z", "https://a.example/rss"),
        record("https://b.example/1", "Fresh", "2024-02-01 08:30:00 +0100", "https://b.example/rss"),
        record("https://c.example/1", "Saved", "2024-01-01T00:00:00Z", "https://c.example/rss"),
    ]))
    .unwrap();
    Board::with_articles(decode_articles(&body).unwrap())
}

fn column(board: &Board, status: Status) -> Vec<String> {
    board.ordered(status).map(|a| a.link.to_string()).collect()
}

fn statuses(board: &Board) -> Vec<(String, Status)> {
    board
        .catalog()
        .iter()
        .map(|a| (a.link.to_string(), a.status))
        .collect()
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_scenario_two_moves_two_undos() {
    let mut board = abc_board();
    let original = statuses(&board);

    board
        .move_article("https://a.example/1", Status::Fresh, Status::Archived)
        .unwrap();
    board
        .move_article("https://b.example/1", Status::Fresh, Status::Saved)
        .unwrap();

    assert!(column(&board, Status::Fresh).is_empty());
    assert_eq!(
        column(&board, Status::Saved),
        vec!["https://b.example/1", "https://c.example/1"]
    );
    assert_eq!(column(&board, Status::Archived), vec!["https://a.example/1"]);
    assert_eq!(board.history().undo_len(), 2);
    assert_eq!(board.cursor(Status::Fresh), None);

    board.undo();
    board.undo();

    assert_eq!(statuses(&board), original);
    assert_eq!(board.history().undo_len(), 0);
    assert_eq!(board.history().redo_len(), 2);
    // B came back first and kept the cursor
    assert_eq!(board.cursor(Status::Fresh), Some("https://b.example/1"));
}

#[test]
fn test_same_column_move_changes_nothing() {
    let mut board = abc_board();
    let before = statuses(&board);
    let state = board.state();

    let err = board
        .move_article("https://a.example/1", Status::Fresh, Status::Fresh)
        .unwrap_err();

    assert!(matches!(err, BoardError::InvalidMove { .. }));
    assert_eq!(statuses(&board), before);
    assert_eq!(board.state(), state);
    assert_eq!(board.history().undo_len(), 0);
}

#[test]
fn test_interpreter_walkthrough() {
    let mut board = abc_board();

    // Fresh: A, B. Move B right, the cursor falls back to A.
    board.execute(Command::CursorDown);
    let outcome = board.execute(Command::MoveRight);
    let sync = outcome.sync.unwrap();
    assert_eq!(&*sync.key, "https://b.example/1");
    assert_eq!(sync.status, Status::Saved);
    assert_eq!(board.cursor(Status::Fresh), Some("https://a.example/1"));

    // Moving left from Fresh wraps to Archived.
    board.execute(Command::MoveLeft);
    assert_eq!(column(&board, Status::Archived), vec!["https://a.example/1"]);
    assert!(board.is_empty(Status::Fresh));

    let undo = board.execute(Command::Undo);
    assert!(undo.sync.is_none());
    assert_eq!(column(&board, Status::Fresh), vec!["https://a.example/1"]);

    board.execute(Command::FocusLeft);
    assert_eq!(board.focus(), Status::Archived);
    assert!(board.execute(Command::Open).open.is_none());
}

#[test]
fn test_source_sort_round_trip() {
    let mut board = abc_board();
    board
        .move_article("https://c.example/1", Status::Saved, Status::Fresh)
        .unwrap();
    let recency = column(&board, Status::Fresh);

    board.execute(Command::ToggleSort);
    assert_eq!(board.sort_mode(), SortMode::BySource);
    board.execute(Command::ToggleSort);

    assert_eq!(column(&board, Status::Fresh), recency);
}

#[test]
fn test_reingest_clears_history() {
    let mut board = abc_board();
    board.execute(Command::MoveRight);
    assert!(board.history().can_undo());

    let body = serde_json::to_vec(&serde_json::json!([record(
        "https://d.example/1",
        "Archived",
        "2024-05-01T00:00:00Z",
        "https://d.example/rss"
    )]))
    .unwrap();
    board.ingest(decode_articles(&body).unwrap());

    assert!(!board.history().can_undo());
    assert!(board.is_empty(Status::Fresh));
    assert_eq!(board.cursor(Status::Archived), Some("https://d.example/1"));
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::FocusLeft),
        Just(Command::FocusRight),
        Just(Command::CursorUp),
        Just(Command::CursorDown),
        Just(Command::MoveLeft),
        Just(Command::MoveRight),
        Just(Command::Undo),
        Just(Command::Redo),
        Just(Command::Reset),
        Just(Command::ToggleSort),
    ]
}

fn arb_board() -> impl Strategy<Value = Board> {
    prop::collection::vec((0usize..3, 0i64..1000, 0usize..3), 0..12).prop_map(|specs| {
        let records: Vec<_> = specs
            .iter()
            .enumerate()
            .map(|(i, (status, secs, source))| {
                let published = chrono::DateTime::from_timestamp(1_700_000_000 + secs, 0)
                    .unwrap()
                    .to_rfc3339();
                record(
                    &format!("https://example.com/{i}"),
                    Status::ALL[*status].label(),
                    &published,
                    &format!("https://source{source}.example/rss"),
                )
            })
            .collect();
        let body = serde_json::to_vec(&records).unwrap();
        Board::with_articles(decode_articles(&body).unwrap())
    })
}

proptest! {
    #[test]
    fn cursors_stay_valid(mut board in arb_board(), commands in prop::collection::vec(arb_command(), 0..40)) {
        for command in commands {
            board.execute(command);
            for status in Status::ALL {
                let members = column(&board, status);
                match board.cursor(status) {
                    Some(key) => prop_assert!(members.iter().any(|m| m == key)),
                    None => prop_assert!(members.is_empty()),
                }
            }
            prop_assert!(board.history().undo_len() <= 10);
        }
    }

    #[test]
    fn undo_everything_restores_statuses(mut board in arb_board(), commands in prop::collection::vec(arb_command(), 0..30)) {
        let original = statuses(&board);
        let moves: Vec<Command> = commands
            .into_iter()
            .filter(|c| matches!(c, Command::MoveLeft | Command::MoveRight | Command::CursorDown | Command::FocusRight))
            .collect();

        let mut committed = 0;
        for command in moves {
            if board.execute(command).sync.is_some() {
                committed += 1;
            }
        }
        // At most 10 moves can be undone
        prop_assume!(committed <= 10);
        while board.undo().is_some() {}

        prop_assert_eq!(statuses(&board), original);
    }
}
