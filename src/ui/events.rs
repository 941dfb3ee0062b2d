//! Application event handling.
//!
//! Processes results of background tasks. Sync outcomes only ever affect the
//! status bar: the board already holds the committed state.

use crate::app::{App, AppEvent};

/// Handle one event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::SyncCompleted { key, status } => {
            tracing::debug!(key = %key, status = %status, "Sync acknowledged");
            app.needs_redraw = true;
        }
        AppEvent::SyncFailed { key, status, error } => {
            tracing::debug!(key = %key, status = %status, "Reporting sync failure");
            app.set_status(format!("Sync failed: {error}"));
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_status(format!("Internal error in {task} task"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Status;
    use crate::config::Config;
    use crate::preferences::PreferenceManager;
    use crate::storage::Database;
    use std::sync::Arc;

    async fn app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        App::new(db, PreferenceManager::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_sync_failure_sets_status() {
        let mut app = app().await;
        handle_app_event(
            &mut app,
            AppEvent::SyncFailed {
                key: Arc::from("https://example.com/a"),
                status: Status::Saved,
                error: "Server returned HTTP 500".to_string(),
            },
        );

        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Sync failed: Server returned HTTP 500");
    }

    #[tokio::test]
    async fn test_sync_success_is_silent() {
        let mut app = app().await;
        handle_app_event(
            &mut app,
            AppEvent::SyncCompleted {
                key: Arc::from("https://example.com/a"),
                status: Status::Archived,
            },
        );
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_panic_reported() {
        let mut app = app().await;
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "sync",
                error: "boom".to_string(),
            },
        );
        assert!(app.status_message.is_some());
    }
}
