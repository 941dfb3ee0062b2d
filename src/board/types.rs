use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// Status (Column)
// ============================================================================

/// Triage state of an article. Each variant is also one board column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum Status {
    #[default]
    Fresh,
    Saved,
    Archived,
}

impl Status {
    /// All columns in display order (left to right).
    pub const ALL: [Status; 3] = [Status::Fresh, Status::Saved, Status::Archived];

    /// Position of this column in `ALL`.
    pub const fn index(self) -> usize {
        match self {
            Self::Fresh => 0,
            Self::Saved => 1,
            Self::Archived => 2,
        }
    }

    /// Cyclic neighbour to the left: Fresh wraps to Archived.
    pub const fn left(self) -> Self {
        match self {
            Self::Fresh => Self::Archived,
            Self::Saved => Self::Fresh,
            Self::Archived => Self::Saved,
        }
    }

    /// Cyclic neighbour to the right: Archived wraps to Fresh.
    pub const fn right(self) -> Self {
        match self {
            Self::Fresh => Self::Saved,
            Self::Saved => Self::Archived,
            Self::Archived => Self::Fresh,
        }
    }

    /// Wire label, as used by the article service.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Saved => "Saved",
            Self::Archived => "Archived",
        }
    }

    /// Lowercase slug used in preference keys.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Saved => "saved",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Accepts the wire labels and the lowercase slugs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fresh" | "fresh" => Ok(Self::Fresh),
            "Saved" | "saved" => Ok(Self::Saved),
            "Archived" | "archived" => Ok(Self::Archived),
            _ => Err(format!("'{s}' is not a valid read status")),
        }
    }
}

// ============================================================================
// Sort Mode
// ============================================================================

/// Ordering policy applied to every column at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Newest first.
    #[default]
    ByRecency,
    /// Grouped by channel source URL, ascending.
    BySource,
}

impl SortMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::ByRecency => Self::BySource,
            Self::BySource => Self::ByRecency,
        }
    }

    /// Stable name for preferences and config.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByRecency => "recency",
            Self::BySource => "source",
        }
    }

    /// Parse a stored or configured mode name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recency" | "by_recency" | "date" => Some(Self::ByRecency),
            "source" | "by_source" | "channel" => Some(Self::BySource),
            _ => None,
        }
    }

    /// Human-readable name for the status bar.
    pub fn name(self) -> &'static str {
        match self {
            Self::ByRecency => "Recent",
            Self::BySource => "Source",
        }
    }
}

/// Cursor travel direction within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

// ============================================================================
// Article
// ============================================================================

/// Channel (feed) metadata attached to an article.
///
/// Shared by every article of the same channel, so string fields are `Arc<str>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: Arc<str>,
    pub icon: Option<Arc<str>>,
    pub source_url: Arc<str>,
    /// Dominant display color as supplied by the service (e.g. `#1e88e5`).
    pub dominant_color: Option<Arc<str>>,
}

/// A syndicated article on the board.
///
/// `link` is the identity. Only `status` changes after ingestion, and only
/// through the board's move/undo engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub link: Arc<str>,
    pub title: Arc<str>,
    pub published: DateTime<Utc>,
    pub channel: Channel,
    pub summary: Arc<str>,
    pub image: Option<Arc<str>>,
    pub status: Status,
}

impl Article {
    pub fn key(&self) -> &str {
        &self.link
    }
}

/// One committed reclassification; the undo unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub key: Arc<str>,
    pub from: Status,
    pub to: Status,
}

impl MoveRecord {
    /// The record that reverses this move.
    pub fn inverse(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            from: self.to,
            to: self.from,
        }
    }
}
