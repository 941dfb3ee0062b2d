//! Preview pane for the focused column's selected article.

use crate::app::App;
use crate::util::{collapse_whitespace, format_age, strip_control_chars};
use chrono::Utc;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.column_border)
        .title(" Preview ");

    let Some(article) = app.board.selected(app.board.focus()) else {
        let empty = Paragraph::new(Span::styled("No article selected", palette.column_empty))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let summary = collapse_whitespace(&strip_control_chars(&article.summary));
    let mut lines = vec![
        Line::from(Span::styled(article.title.as_ref(), palette.preview_title)),
        Line::from(vec![
            Span::styled(
                article.channel.name.as_ref(),
                palette.channel(article.channel.dominant_color.as_deref()),
            ),
            Span::styled(
                format!(
                    "  {} ({} ago)",
                    article.published.format("%Y-%m-%d %H:%M"),
                    format_age(Utc::now(), article.published)
                ),
                palette.preview_meta,
            ),
        ]),
        Line::from(Span::styled(article.link.as_ref(), palette.preview_link)),
        Line::from(""),
    ];
    if summary.is_empty() {
        lines.push(Line::from(Span::styled("(no summary)", palette.column_empty)));
    } else {
        lines.push(Line::from(Span::styled(summary, palette.preview_body)));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
