use crate::board::{Article, Board, Command, Outcome, Status};
use crate::keybindings::KeybindingRegistry;
use crate::net::SyncNotifier;
use crate::preferences::PreferenceManager;
use crate::storage::Database;
use crate::theme::{ColorPalette, ThemeVariant};
use crate::util::validate_link;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Background Events
// ============================================================================

/// Results of background tasks, delivered to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The status service acknowledged a move.
    SyncCompleted { key: Arc<str>, status: Status },
    /// A status notification failed. Local state is kept as is.
    SyncFailed {
        key: Arc<str>,
        status: Status,
        error: String,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

/// Hands a validated link to the system opener.
type Opener = Box<dyn Fn(&str) -> std::io::Result<()> + Send>;

fn system_opener() -> Opener {
    Box::new(|link: &str| open::that_detached(link))
}

// ============================================================================
// App
// ============================================================================

/// Runtime state: the board plus everything its commands touch.
pub struct App {
    pub board: Board,
    pub db: Database,
    pub prefs: PreferenceManager,
    /// `None` when sync is disabled (offline, import, or config).
    pub notifier: Option<SyncNotifier>,
    pub keybindings: KeybindingRegistry,
    pub palette: ColorPalette,

    /// Transient message and when it was set.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub show_help: bool,
    pub show_preview: bool,
    /// Set whenever visible state changed since the last frame.
    pub needs_redraw: bool,

    /// In-flight status notifications.
    pending_syncs: Vec<JoinHandle<()>>,
    opener: Opener,
}

impl App {
    /// Build the app over an empty board; keybinding overrides from the
    /// preferences are applied here and any problems are logged.
    pub fn new(db: Database, prefs: PreferenceManager) -> Self {
        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&prefs.keybinding_overrides()) {
            tracing::warn!(warning = %warning, "Keybinding override ignored");
        }

        Self {
            board: Board::new(),
            db,
            prefs,
            notifier: None,
            keybindings,
            palette: ThemeVariant::default().palette(),
            status_message: None,
            show_help: false,
            show_preview: false,
            needs_redraw: true,
            pending_syncs: Vec::new(),
            opener: system_opener(),
        }
    }

    pub fn with_notifier(mut self, notifier: Option<SyncNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_theme(mut self, variant: ThemeVariant) -> Self {
        self.palette = variant.palette();
        self
    }

    /// Replace the system opener (tests record links instead of launching a browser).
    pub fn with_opener<F>(mut self, opener: F) -> Self
    where
        F: Fn(&str) -> std::io::Result<()> + Send + 'static,
    {
        self.opener = Box::new(opener);
        self
    }

    /// Populate the board for this session and apply the stored state.
    ///
    /// Stored cursors that no longer match their column are repaired by the
    /// board. Returns the number of duplicate links dropped.
    pub fn load_articles(&mut self, articles: Vec<Article>) -> usize {
        let duplicates = self.board.ingest(articles);
        self.board.restore(&self.prefs.board_state());
        self.needs_redraw = true;
        duplicates
    }

    /// Run one board command to completion.
    ///
    /// Changed preferences are written before this returns. A committed move
    /// spawns its status notification without waiting for it; the result
    /// arrives later on `event_tx`.
    pub async fn dispatch(&mut self, command: Command, event_tx: &mpsc::Sender<AppEvent>) -> Outcome {
        let outcome = self.board.execute(command);
        if outcome.is_noop() && outcome.message.is_none() {
            return outcome;
        }
        self.needs_redraw = true;

        if let Err(e) = self.prefs.persist(&self.db, &outcome.changes).await {
            tracing::error!(error = %e, "Failed to save board preferences");
            self.set_status("Could not save board state");
        } else if let Some(message) = &outcome.message {
            self.set_status(message.clone());
        }

        if let Some(request) = &outcome.sync {
            match &self.notifier {
                Some(notifier) => {
                    self.pending_syncs.retain(|h| !h.is_finished());
                    self.pending_syncs.push(crate::ui::helpers::spawn_sync(
                        notifier.clone(),
                        request.clone(),
                        event_tx.clone(),
                    ));
                }
                None => tracing::debug!(key = %request.key, "Sync disabled, move kept locally"),
            }
        }

        if let Some(link) = &outcome.open {
            self.open_link(link);
        }

        outcome
    }

    fn open_link(&mut self, link: &str) {
        let url = match validate_link(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(link = %link, error = %e, "Refusing to open link");
                self.set_status(format!("Cannot open link: {e}"));
                return;
            }
        };
        match (self.opener)(url.as_str()) {
            Ok(()) => {
                tracing::debug!(url = %url, "Opened link");
                self.set_status("Opened in browser");
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                self.set_status("Failed to open browser");
            }
        }
    }

    /// Number of status notifications still in flight.
    pub fn pending_sync_count(&self) -> usize {
        self.pending_syncs.iter().filter(|h| !h.is_finished()).count()
    }

    /// Give in-flight notifications up to `grace` to finish, then abort the rest.
    pub async fn drain_syncs(&mut self, grace: Duration) {
        let handles: Vec<_> = self.pending_syncs.drain(..).collect();
        if handles.is_empty() {
            return;
        }
        let aborts: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();
        if tokio::time::timeout(grace, futures::future::join_all(handles))
            .await
            .is_err()
        {
            tracing::warn!(pending = aborts.len(), "Abandoning unfinished status updates");
            for handle in aborts {
                handle.abort();
            }
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        for handle in self.pending_syncs.drain(..) {
            handle.abort();
        }
    }
}
