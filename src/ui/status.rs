use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style) = match &app.status_message {
        Some((msg, _)) => (Cow::Borrowed(msg.as_ref()), app.palette.status_message),
        None => (Cow::Owned(summary(app)), app.palette.status_bar),
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Default status line: sort mode, history depth, sync mode and a help hint.
pub(super) fn summary(app: &App) -> String {
    let history = app.board.history();
    let sync = match (&app.notifier, app.pending_sync_count()) {
        (None, _) => "offline".to_string(),
        (Some(_), 0) => "synced".to_string(),
        (Some(_), n) => format!("syncing {n}"),
    };
    format!(
        " Sort: {} | undo {} redo {} | {} | [?] help [q] quit",
        app.board.sort_mode().name(),
        history.undo_len(),
        history.redo_len(),
        sync,
    )
}
