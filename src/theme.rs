//! Theme system for the TUI.
//!
//! `ThemeVariant` selects between Dark and Light palettes; `ColorPalette`
//! holds one `Style` per visual role of the board. Channel accent colors come
//! from the article service and are parsed by [`channel_color`].

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every board role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Columns --
    pub column_border: Style,
    pub column_border_focused: Style,
    pub column_title: Style,
    pub column_empty: Style,

    // -- Items --
    pub item_title: Style,
    /// Cursor row in the focused column.
    pub item_selected: Style,
    /// Cursor row in an unfocused column.
    pub item_cursor: Style,
    pub item_age: Style,
    /// Channel name when the service supplied no usable color.
    pub item_channel: Style,

    // -- Preview --
    pub preview_title: Style,
    pub preview_meta: Style,
    pub preview_body: Style,
    pub preview_link: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_message: Style,
    pub help_key: Style,
    pub help_border: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            column_border: Style::default().fg(Color::DarkGray),
            column_border_focused: Style::default().fg(Color::Cyan),
            column_title: Style::default().add_modifier(Modifier::BOLD),
            column_empty: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            item_title: Style::default(),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_cursor: Style::default().add_modifier(Modifier::UNDERLINED),
            item_age: Style::default().fg(Color::DarkGray),
            item_channel: Style::default().fg(Color::Cyan),

            preview_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            preview_meta: Style::default().fg(Color::DarkGray),
            preview_body: Style::default(),
            preview_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_message: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            help_border: Style::default().fg(Color::Cyan),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            column_border: Style::default().fg(Color::Gray),
            column_border_focused: Style::default().fg(Color::Blue),
            column_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            column_empty: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            item_title: Style::default().fg(Color::Black),
            item_selected: Style::default().bg(Color::Blue).fg(Color::White),
            item_cursor: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::UNDERLINED),
            item_age: Style::default().fg(Color::DarkGray),
            item_channel: Style::default().fg(Color::Blue),

            preview_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            preview_meta: Style::default().fg(Color::DarkGray),
            preview_body: Style::default().fg(Color::Black),
            preview_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_message: Style::default()
                .bg(Color::White)
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            help_border: Style::default().fg(Color::Blue),
        }
    }

    /// Style for a channel name: the channel's own color when it parses,
    /// otherwise `item_channel`.
    pub fn channel(&self, dominant_color: Option<&str>) -> Style {
        match dominant_color.and_then(channel_color) {
            Some(color) => Style::default().fg(color),
            None => self.item_channel,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        ThemeVariant::default().palette()
    }
}

// ============================================================================
// Channel Colors
// ============================================================================

/// Parse a service-supplied color (`#1e88e5`, `#18e`, with or without `#`).
pub fn channel_color(hex: &str) -> Option<Color> {
    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        // #rgb expands each digit: #18e == #1188ee
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
