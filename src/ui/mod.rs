//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Frame layout
//! - `helpers` - Background task spawning
//! - `columns` - The three board columns
//! - `preview` - Selected article preview pane
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod columns;
mod events;
mod help;
pub(crate) mod helpers;
mod input;
mod loop_runner;
mod preview;
mod render;
mod status;

pub use loop_runner::{run, Action};
