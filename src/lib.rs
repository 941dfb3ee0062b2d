//! Keyboard-driven triage board for syndicated articles.
//!
//! Articles loaded from an article service are sorted into three columns
//! (Fresh, Saved, Archived) and moved between them with undoable moves.
//! Committed moves are reported back to the service in the background.

pub mod app;
pub mod board;
pub mod config;
pub mod keybindings;
pub mod net;
pub mod preferences;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
