//! Background task helpers shared by the app and the event loop.

use crate::app::AppEvent;
use crate::board::SyncRequest;
use crate::net::SyncNotifier;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// A panic inside a spawned task would otherwise vanish into the runtime; this
/// turns it into `Err(panic_message)` so the task can report it.
///
/// # Example
///
/// ```ignore
/// tokio::spawn(async move {
///     if let Err(panic_msg) = catch_task_panic(async { do_work().await }).await {
///         let _ = tx.send(AppEvent::TaskPanicked { task: "work", error: panic_msg }).await;
///     }
/// });
/// ```
pub(crate) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Send one status notification in the background.
///
/// Never awaited by the caller. The outcome comes back as
/// `AppEvent::SyncCompleted` / `AppEvent::SyncFailed`; failures are also
/// logged here at warn. Local state is never reverted.
pub(crate) fn spawn_sync(
    notifier: SyncNotifier,
    request: SyncRequest,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        let result = catch_task_panic(async {
            let event = match notifier.notify(&request).await {
                Ok(ack) => {
                    tracing::debug!(
                        key = %request.key,
                        status = %request.status,
                        message = %ack.message,
                        "Status update acknowledged"
                    );
                    AppEvent::SyncCompleted {
                        key: request.key.clone(),
                        status: request.status,
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        key = %request.key,
                        status = %request.status,
                        error = %e,
                        "Status update failed"
                    );
                    AppEvent::SyncFailed {
                        key: request.key.clone(),
                        status: request.status,
                        error: e.to_string(),
                    }
                }
            };
            if let Err(e) = tx.send(event).await {
                tracing::debug!(error = %e, "Sync result dropped (receiver closed)");
            }
        })
        .await;

        if let Err(panic_msg) = result {
            tracing::error!(task = "sync", error = %panic_msg, "Background task panicked");
            let _ = tx_panic
                .send(AppEvent::TaskPanicked {
                    task: "sync",
                    error: panic_msg,
                })
                .await;
        }
    })
}
