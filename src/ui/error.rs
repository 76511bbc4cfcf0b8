//! Error panel rendering.
//!
//! Shown in place of the video list after a failed load, until a retry
//! succeeds.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Render the persistent error panel.
///
/// # Arguments
/// * `message` - Error description from the failed load
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
pub fn render_error(message: &str, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            "Could not load videos",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(message.to_string())),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'r' to retry",
            Style::default().fg(Color::Gray),
        )),
    ];

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Red)),
    );

    Widget::render(panel, area, buf);
}
