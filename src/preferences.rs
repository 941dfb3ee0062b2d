//! Preference manager that merges config.toml defaults with DB overrides.
//!
//! Config values serve as defaults; DB values (user_preferences table) override them.
//! Writes always go to the DB, never to the config file.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::board::{BoardState, PrefChange, SortMode, Status};
use crate::config::Config;
use crate::storage::Database;

/// Preference key of the focused column.
pub const KEY_FOCUS: &str = "board.focus";
/// Preference key of the sort mode.
pub const KEY_SORT: &str = "board.sort";
const KEY_RESTORE: &str = "restore_session";
const KEYBIND_PREFIX: &str = "keybind.";

/// Preference key of one column's cursor (`board.cursor.fresh`, ...).
pub fn cursor_key(column: Status) -> String {
    format!("board.cursor.{}", column.slug())
}

/// The stored `(key, value)` pair for one change. A cleared cursor is stored
/// as the empty string.
pub fn encode_change(change: &PrefChange) -> (String, String) {
    match change {
        PrefChange::Focus(column) => (KEY_FOCUS.to_string(), column.slug().to_string()),
        PrefChange::SortMode(mode) => (KEY_SORT.to_string(), mode.as_str().to_string()),
        PrefChange::Cursor(column, key) => (
            cursor_key(*column),
            key.as_deref().unwrap_or_default().to_string(),
        ),
    }
}

// ============================================================================
// PreferenceManager
// ============================================================================

/// Merged preference store: config.toml defaults + DB overrides.
///
/// Reads are in-memory. Writes persist to the DB first and only then update
/// the in-memory map, so a failed write leaves both sides unchanged.
pub struct PreferenceManager {
    prefs: HashMap<String, String>,
    /// Configured sort mode, used when the stored one is unusable.
    default_sort: SortMode,
}

impl PreferenceManager {
    /// Load preferences by merging config defaults with DB overrides.
    pub async fn load(config: &Config, db: &Database) -> Result<Self> {
        let mut prefs = Self::flatten_config(config);

        for (key, value) in db.get_preferences_by_prefix("").await? {
            prefs.insert(key, value);
        }

        Ok(Self {
            prefs,
            default_sort: config.sort_mode().unwrap_or_default(),
        })
    }

    /// Create from config only (no DB). Fallback for when DB load fails.
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefs: Self::flatten_config(config),
            default_sort: config.sort_mode().unwrap_or_default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.prefs.get(key).map(String::as_str)
    }

    /// Set one preference: writes to DB, then updates the in-memory map.
    pub async fn set(&mut self, db: &Database, key: &str, value: &str) -> Result<()> {
        db.set_preference(key, value).await?;
        self.prefs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Persist the changes reported by one command in a single transaction.
    pub async fn persist(&mut self, db: &Database, changes: &[PrefChange]) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let entries: Vec<(String, String)> = changes.iter().map(encode_change).collect();
        db.set_preferences(&entries).await?;
        tracing::debug!(count = entries.len(), "Persisted board preferences");
        self.prefs.extend(entries);
        Ok(())
    }

    // ========================================================================
    // Type-safe Accessors
    // ========================================================================

    /// Whether stored board state is applied at startup.
    pub fn restore_session(&self) -> bool {
        self.get(KEY_RESTORE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(true)
    }

    /// Current sort mode. Unreadable values fall back to the configured one.
    pub fn sort_mode(&self) -> SortMode {
        match self.get(KEY_SORT) {
            Some(raw) => SortMode::from_str_name(raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Ignoring unreadable stored sort mode");
                self.default_sort
            }),
            None => self.default_sort,
        }
    }

    /// Focused column. Unreadable values fall back to Fresh.
    pub fn focus(&self) -> Status {
        match self.get(KEY_FOCUS) {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Ignoring unreadable stored focus");
                Status::default()
            }),
            None => Status::default(),
        }
    }

    /// Stored cursor key for `column`; empty means none.
    pub fn cursor(&self, column: Status) -> Option<Arc<str>> {
        self.get(&cursor_key(column))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(Arc::from)
    }

    /// Board state to restore at startup.
    ///
    /// With `restore_session` off only the configured sort mode is used; focus
    /// and cursors start from their defaults. Cursor keys are not validated
    /// here: the board repairs any that no longer belong to their column.
    pub fn board_state(&self) -> BoardState {
        if !self.restore_session() {
            return BoardState {
                sort_mode: self.default_sort,
                ..BoardState::default()
            };
        }

        BoardState {
            focus: self.focus(),
            sort_mode: self.sort_mode(),
            cursors: Status::ALL.map(|column| self.cursor(column)),
        }
    }

    /// Keybinding overrides from config (`keybind.<action>` keys), as the
    /// action → key-string map the registry accepts.
    pub fn keybinding_overrides(&self) -> HashMap<String, String> {
        self.prefs
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(KEYBIND_PREFIX)
                    .map(|action| (action.to_string(), value.clone()))
            })
            .collect()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Flatten Config struct into dotted key-value pairs.
    fn flatten_config(config: &Config) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert(KEY_RESTORE.to_string(), config.restore_session.to_string());
        map.insert(KEY_SORT.to_string(), config.default_sort.clone());

        for (action, key_str) in &config.keybindings {
            map.insert(format!("{}{}", KEYBIND_PREFIX, action), key_str.clone());
        }

        map
    }
}

// ============================================================================
// Tests
// ============================================================================
