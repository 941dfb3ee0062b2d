//! Local Preference Store: a small SQLite key/value table holding the focused
//! column, sort mode and per-column cursor keys between sessions.

mod preferences;
mod schema;
mod types;

pub use schema::Database;
pub use types::DatabaseError;
