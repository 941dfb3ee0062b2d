use crate::app::App;
use crate::board::{Article, Status};
use crate::theme::ColorPalette;
use crate::util::{display_width, format_age, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the three board columns side by side.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let now = Utc::now();
    for (column, chunk) in Status::ALL.into_iter().zip(chunks.iter()) {
        render_column(f, app, column, *chunk, now);
    }
}

fn render_column(f: &mut Frame, app: &App, column: Status, area: Rect, now: DateTime<Utc>) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let focused = app.board.focus() == column;
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = if app.board.is_empty(column) {
        vec![ListItem::new(Span::styled("Nothing here", palette.column_empty))]
    } else {
        app.board
            .ordered(column)
            .map(|article| ListItem::new(item_lines(article, palette, inner_width, now)))
            .collect()
    };

    let border_style = if focused {
        palette.column_border_focused
    } else {
        palette.column_border
    };
    let highlight = if focused {
        palette.item_selected
    } else {
        palette.item_cursor
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(column_title(app, column), palette.column_title)),
        )
        .highlight_style(highlight);

    let mut state = ListState::default().with_selected(app.board.selected_index(column));
    f.render_stateful_widget(list, area, &mut state);
}

/// "Fresh (12)"
pub(super) fn column_title(app: &App, column: Status) -> String {
    format!(" {} ({}) ", column, app.board.len(column))
}

/// Two lines per article: title, then age and channel name.
fn item_lines<'a>(
    article: &'a Article,
    palette: &ColorPalette,
    width: usize,
    now: DateTime<Utc>,
) -> Vec<Line<'a>> {
    let title = truncate_to_width(&article.title, width);
    let age = format_age(now, article.published);
    let channel_width = width.saturating_sub(display_width(&age) + 2);
    let channel = truncate_to_width(&article.channel.name, channel_width);

    vec![
        Line::from(Span::styled(title, palette.item_title)),
        Line::from(vec![
            Span::styled(age, palette.item_age),
            Span::raw("  "),
            Span::styled(
                channel,
                palette.channel(article.channel.dominant_color.as_deref()),
            ),
        ]),
    ]
}
