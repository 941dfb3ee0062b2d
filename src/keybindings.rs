//! Keybinding registry: maps key events to actions, with config overrides.
//!
//! Board actions translate to [`Command`]s for the board engine; the rest
//! (quit, help, preview) are handled by the UI.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

use crate::board::Command;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    FocusLeft,
    FocusRight,
    NavUp,
    NavDown,
    MoveLeft,
    MoveRight,
    Open,
    Undo,
    Redo,
    Reset,
    ToggleSort,
    TogglePreview,
    ShowHelp,
    Back,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::FocusLeft => "Focus column to the left",
            Self::FocusRight => "Focus column to the right",
            Self::NavUp => "Select previous article",
            Self::NavDown => "Select next article",
            Self::MoveLeft => "Move article to the left column",
            Self::MoveRight => "Move article to the right column",
            Self::Open => "Open article in browser",
            Self::Undo => "Undo last move",
            Self::Redo => "Redo move",
            Self::Reset => "Reset cursors to the top",
            Self::ToggleSort => "Toggle sort (recent / source)",
            Self::TogglePreview => "Toggle preview pane",
            Self::ShowHelp => "Show help",
            Self::Back => "Close overlay",
        }
    }

    /// The board command this action issues, if it is a board action.
    pub fn command(self) -> Option<Command> {
        Some(match self {
            Self::FocusLeft => Command::FocusLeft,
            Self::FocusRight => Command::FocusRight,
            Self::NavUp => Command::CursorUp,
            Self::NavDown => Command::CursorDown,
            Self::MoveLeft => Command::MoveLeft,
            Self::MoveRight => Command::MoveRight,
            Self::Open => Command::Open,
            Self::Undo => Command::Undo,
            Self::Redo => Command::Redo,
            Self::Reset => Command::Reset,
            Self::ToggleSort => Command::ToggleSort,
            Self::Quit | Self::TogglePreview | Self::ShowHelp | Self::Back => return None,
        })
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// The board itself.
    Global,
    /// The help overlay is open.
    Help,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
///
/// SHIFT is never stored for character keys: the shifted character itself
/// (`'H'`, `'?'`) identifies the key, since terminals disagree on whether
/// they also report the modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let modifiers = match code {
            KeyCode::Char(_) => modifiers - KeyModifiers::SHIFT,
            _ => modifiers,
        };
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

fn parse_named_key(s: &str) -> Option<KeyCode> {
    let code = match s.to_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "backspace" => KeyCode::Backspace,
        "space" => KeyCode::Char(' '),
        _ => return None,
    };
    Some(code)
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "H", "?"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Left", "Space"
/// - Modifier combos: "Ctrl+z", "Shift+Left"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    if let Some(rest) = s.strip_prefix("Shift+") {
        let rest = rest.trim();
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c.to_ascii_uppercase()))),
            _ => parse_named_key(rest).map(KeySpec::shift),
        };
    }

    if let Some(code) = parse_named_key(s) {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
    {
        if (1..=12).contains(&n) {
            return Some(KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let mut modifier = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        modifier.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        modifier.push_str("Shift+");
    }

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to `Global`.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;

        let global = [
            (KeySpec::plain(KeyCode::Char('q')), Quit),
            (KeySpec::plain(KeyCode::Char('h')), FocusLeft),
            (KeySpec::plain(KeyCode::Left), FocusLeft),
            (KeySpec::plain(KeyCode::Char('l')), FocusRight),
            (KeySpec::plain(KeyCode::Right), FocusRight),
            (KeySpec::plain(KeyCode::Char('k')), NavUp),
            (KeySpec::plain(KeyCode::Up), NavUp),
            (KeySpec::plain(KeyCode::Char('j')), NavDown),
            (KeySpec::plain(KeyCode::Down), NavDown),
            (KeySpec::plain(KeyCode::Char('H')), MoveLeft),
            (KeySpec::shift(KeyCode::Left), MoveLeft),
            (KeySpec::plain(KeyCode::Char('L')), MoveRight),
            (KeySpec::shift(KeyCode::Right), MoveRight),
            (KeySpec::plain(KeyCode::Char('o')), Open),
            (KeySpec::plain(KeyCode::Enter), Open),
            (KeySpec::ctrl('z'), Undo),
            (KeySpec::ctrl('y'), Redo),
            (KeySpec::plain(KeyCode::Char('r')), Reset),
            (KeySpec::plain(KeyCode::Char('s')), ToggleSort),
            (KeySpec::plain(KeyCode::Char('p')), TogglePreview),
            (KeySpec::plain(KeyCode::Char('?')), ShowHelp),
            (KeySpec::plain(KeyCode::Esc), Back),
        ];
        for (key, action) in global {
            self.bind(Context::Global, key, action);
        }

        // While help is open, its own keys close it instead of acting.
        let help = [
            (KeySpec::plain(KeyCode::Esc), Back),
            (KeySpec::plain(KeyCode::Char('?')), Back),
            (KeySpec::plain(KeyCode::Char('q')), Back),
        ];
        for (key, action) in help {
            self.bind(Context::Help, key, action);
        }
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "move_right").
    /// Values are key strings (e.g., "q", "Ctrl+z", "Shift+Left"). An override
    /// replaces every default key of that action, in the same contexts.
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted so the result does not depend on HashMap iteration order.
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort();

        for (action_name, key_str) in entries {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                // The new key takes over; drop whatever it was bound to before.
                if let Some(previous) = self.lookup.insert((ctx, key), action) {
                    self.bindings
                        .retain(|(c, k, a)| !(*c == ctx && *k == key && *a == previous));
                    tracing::warn!(
                        key = %key_str,
                        replaced = ?previous,
                        "Keybinding override shadows another action"
                    );
                }
                self.bindings.push((ctx, key, action));
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// Board bindings for the help screen, grouped per action in first-bound
    /// order: `(keys joined by " / ", description)`.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries: Vec<(Action, Vec<String>)> = Vec::new();
        for (ctx, key, action) in &self.bindings {
            if *ctx != Context::Global {
                continue;
            }
            match entries.iter_mut().find(|(a, _)| a == action) {
                Some((_, keys)) => keys.push(format_key(key)),
                None => entries.push((*action, vec![format_key(key)])),
            }
        }
        entries
            .into_iter()
            .map(|(action, keys)| (keys.join(" / "), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "focus_left" | "focusleft" => Some(Action::FocusLeft),
        "focus_right" | "focusright" => Some(Action::FocusRight),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "move_left" | "moveleft" => Some(Action::MoveLeft),
        "move_right" | "moveright" => Some(Action::MoveRight),
        "open" | "open_in_browser" => Some(Action::Open),
        "undo" => Some(Action::Undo),
        "redo" => Some(Action::Redo),
        "reset" | "reset_cursors" => Some(Action::Reset),
        "toggle_sort" | "togglesort" | "sort" => Some(Action::ToggleSort),
        "toggle_preview" | "togglepreview" | "preview" => Some(Action::TogglePreview),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        "back" => Some(Action::Back),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(reg: &KeybindingRegistry, code: KeyCode, mods: KeyModifiers) -> Option<Action> {
        reg.action_for_key(code, mods, Context::Global)
    }

    #[test]
    fn test_default_board_keys() {
        let reg = KeybindingRegistry::new();
        let none = KeyModifiers::NONE;
        assert_eq!(lookup(&reg, KeyCode::Char('h'), none), Some(Action::FocusLeft));
        assert_eq!(lookup(&reg, KeyCode::Right, none), Some(Action::FocusRight));
        assert_eq!(lookup(&reg, KeyCode::Char('j'), none), Some(Action::NavDown));
        assert_eq!(lookup(&reg, KeyCode::Up, none), Some(Action::NavUp));
        assert_eq!(lookup(&reg, KeyCode::Enter, none), Some(Action::Open));
        assert_eq!(lookup(&reg, KeyCode::Char('s'), none), Some(Action::ToggleSort));
        assert_eq!(lookup(&reg, KeyCode::Char('r'), none), Some(Action::Reset));
    }

    #[test]
    fn test_shifted_char_ignores_shift_modifier() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeyCode::Char('H'), KeyModifiers::SHIFT),
            Some(Action::MoveLeft)
        );
        assert_eq!(
            lookup(&reg, KeyCode::Char('L'), KeyModifiers::NONE),
            Some(Action::MoveRight)
        );
        assert_eq!(
            lookup(&reg, KeyCode::Char('?'), KeyModifiers::SHIFT),
            Some(Action::ShowHelp)
        );
    }

    #[test]
    fn test_shift_arrows_move() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeyCode::Left, KeyModifiers::SHIFT),
            Some(Action::MoveLeft)
        );
        assert_eq!(
            lookup(&reg, KeyCode::Right, KeyModifiers::SHIFT),
            Some(Action::MoveRight)
        );
    }

    #[test]
    fn test_ctrl_undo_redo() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeyCode::Char('z'), KeyModifiers::CONTROL),
            Some(Action::Undo)
        );
        assert_eq!(
            lookup(&reg, KeyCode::Char('y'), KeyModifiers::CONTROL),
            Some(Action::Redo)
        );
        // Plain 'z' is unbound
        assert_eq!(lookup(&reg, KeyCode::Char('z'), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_help_context_overrides_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Help),
            Some(Action::Back)
        );
        // Unbound in Help falls back to Global
        assert_eq!(
            reg.action_for_key(KeyCode::Char('j'), KeyModifiers::NONE, Context::Help),
            Some(Action::NavDown)
        );
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(Action::MoveRight.command(), Some(Command::MoveRight));
        assert_eq!(Action::NavUp.command(), Some(Command::CursorUp));
        assert_eq!(Action::Undo.command(), Some(Command::Undo));
        assert_eq!(Action::Quit.command(), None);
        assert_eq!(Action::TogglePreview.command(), None);
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("undo".to_string(), "u".to_string())]);

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            lookup(&reg, KeyCode::Char('z'), KeyModifiers::CONTROL),
            None
        );
        assert_eq!(
            lookup(&reg, KeyCode::Char('u'), KeyModifiers::NONE),
            Some(Action::Undo)
        );
    }

    #[test]
    fn test_override_replaces_all_default_keys() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("move_left".to_string(), "Shift+a".to_string())]);
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(lookup(&reg, KeyCode::Char('H'), KeyModifiers::NONE), None);
        assert_eq!(lookup(&reg, KeyCode::Left, KeyModifiers::SHIFT), None);
        assert_eq!(
            lookup(&reg, KeyCode::Char('A'), KeyModifiers::SHIFT),
            Some(Action::MoveLeft)
        );
    }

    #[test]
    fn test_override_onto_bound_key_takes_over() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("undo".to_string(), "r".to_string())]);
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            lookup(&reg, KeyCode::Char('r'), KeyModifiers::NONE),
            Some(Action::Undo)
        );
        assert!(reg
            .help_entries()
            .iter()
            .all(|(_, desc)| *desc != Action::Reset.describe()));
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("refresh_all".to_string(), "R".to_string())]);

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string())]);

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
        // Default binding survives a failed override
        assert_eq!(
            lookup(&reg, KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(
            parse_key_string("Enter"),
            Some(KeySpec::plain(KeyCode::Enter))
        );
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(
            parse_key_string("space"),
            Some(KeySpec::plain(KeyCode::Char(' ')))
        );
        assert_eq!(parse_key_string("Ctrl+z"), Some(KeySpec::ctrl('z')));
        assert_eq!(
            parse_key_string("Shift+Right"),
            Some(KeySpec::shift(KeyCode::Right))
        );
        assert_eq!(
            parse_key_string("Shift+l"),
            Some(KeySpec::plain(KeyCode::Char('L')))
        );
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Fx"), None);
        assert_eq!(
            parse_key_string("F"),
            Some(KeySpec::plain(KeyCode::Char('F')))
        );
        assert_eq!(parse_key_string("jj"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char('q'))), "q");
        assert_eq!(format_key(&KeySpec::ctrl('z')), "Ctrl+z");
        assert_eq!(format_key(&KeySpec::shift(KeyCode::Left)), "Shift+Left");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::F(5))), "F5");
    }

    #[test]
    fn test_help_entries_group_keys() {
        let reg = KeybindingRegistry::new();
        let entries = reg.help_entries();
        assert!(entries.contains(&("H / Shift+Left".to_string(), Action::MoveLeft.describe())));
        assert!(entries.contains(&("o / Enter".to_string(), Action::Open.describe())));
        // One row per Global action
        assert_eq!(entries.len(), 15);
    }
}
