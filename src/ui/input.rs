//! Input handling for the TUI.
//!
//! Resolves key presses to actions through the keybinding registry. Board
//! actions become board commands run by `App::dispatch`; view toggles and
//! quitting are handled here.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // The help overlay captures all keys while visible
    if app.show_help {
        if let Some(KbAction::Back) = app.keybindings.action_for_key(code, modifiers, KbContext::Help)
        {
            app.show_help = false;
            app.needs_redraw = true;
        }
        return Action::Continue;
    }

    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::TogglePreview => {
            app.show_preview = !app.show_preview;
            app.needs_redraw = true;
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.needs_redraw = true;
        }
        KbAction::Back => {
            if app.show_preview {
                app.show_preview = false;
                app.needs_redraw = true;
            }
        }
        board_action => {
            if let Some(command) = board_action.command() {
                app.dispatch(command, event_tx).await;
            }
        }
    }
    Action::Continue
}
