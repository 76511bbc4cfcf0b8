//! Video list widget rendering.
//!
//! Displays a scrollable list of videos with selection highlighting, plus
//! the loading and empty states of the feed.

use crate::app::{App, FeedPhase};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

/// Lines each video occupies (title + channel + date + description + separator).
const LINES_PER_VIDEO: u16 = 5;

/// Render the video list widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Shows a loading placeholder while the first fetch is in flight and an
/// empty-state message when a load resolved with zero videos. Otherwise
/// renders a scrollable list, one multi-line card per video, keeping the
/// selection centered.
pub fn render_list(app: &App, area: Rect, buf: &mut Buffer) {
    match &app.phase {
        FeedPhase::Loading => {
            let placeholder = Paragraph::new("Loading videos...")
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().title("Videos").borders(Borders::ALL));
            Widget::render(placeholder, area, buf);
            return;
        }
        FeedPhase::Empty => {
            let hint = if app.session.search_term.is_empty() {
                "Check back later for new content"
            } else {
                "Try a different search term"
            };
            let lines = vec![
                Line::from(Span::styled(
                    "No videos found",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
            ];
            let empty = Paragraph::new(lines)
                .block(Block::default().title("Videos").borders(Borders::ALL));
            Widget::render(empty, area, buf);
            return;
        }
        // Failed is rendered by the error panel instead of this widget.
        FeedPhase::Failed(_) | FeedPhase::Ready => {}
    }

    if app.videos.is_empty() {
        let list = List::new(vec![ListItem::new("No videos to display")])
            .block(Block::default().title("Videos").borders(Borders::ALL));
        Widget::render(list, area, buf);
        return;
    }

    let selected_index = app.selected_index.min(app.videos.len() - 1);

    let separator_width = area.width.saturating_sub(2).max(10) as usize;
    let separator_line = "─".repeat(separator_width);

    // Keep the selection roughly centered in the visible window.
    let available_height = area.height.saturating_sub(2);
    let visible_videos = (available_height / LINES_PER_VIDEO).max(1) as usize;
    let center_offset = visible_videos / 2;

    let scroll_offset = selected_index.saturating_sub(center_offset);
    let max_scroll = app.videos.len().saturating_sub(visible_videos);
    let scroll_offset = scroll_offset.min(max_scroll);

    let start_idx = scroll_offset;
    let end_idx = (scroll_offset + visible_videos).min(app.videos.len());

    let items: Vec<ListItem> = app
        .videos
        .iter()
        .enumerate()
        .skip(start_idx)
        .take(end_idx - start_idx)
        .map(|(idx, video)| {
            let is_selected = idx == selected_index;

            let base_style = if is_selected {
                Style::default()
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let title_style = Style::default()
                .fg(if is_selected {
                    Color::Yellow
                } else {
                    Color::White
                })
                .add_modifier(Modifier::BOLD);

            let line1 = Line::from(vec![Span::styled(&video.title, title_style)]);

            let line2 = Line::from(vec![Span::styled(
                format!("Channel: {}", video.channel_title),
                Style::default().fg(Color::Cyan),
            )]);

            let line3 = Line::from(vec![Span::styled(
                format!("Published: {}", video.format_published()),
                Style::default().fg(Color::Yellow),
            )]);

            let line4 = Line::from(vec![Span::styled(
                description_snippet(&video.description, separator_width),
                Style::default().fg(Color::Gray),
            )]);

            let separator_style = if is_selected {
                Style::default().fg(Color::Blue)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let separator = Line::from(vec![Span::styled(separator_line.clone(), separator_style)]);

            ListItem::new(vec![line1, line2, line3, line4, separator]).style(base_style)
        })
        .collect();

    let mut title = format!("Videos ({})", app.videos.len());
    if app.can_load_more() {
        title.push_str(" · more available ('m')");
    }

    let relative_selected = if selected_index >= scroll_offset
        && selected_index < scroll_offset + items.len()
        && !items.is_empty()
    {
        Some(selected_index - scroll_offset)
    } else {
        None
    };

    let mut list_state = ListState::default();
    list_state.select(relative_selected);

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );

    StatefulWidget::render(list, area, buf, &mut list_state);
}

/// First line of the description, truncated to the display width.
fn description_snippet(description: &str, width: usize) -> String {
    let first_line = description.lines().next().unwrap_or("");
    let mut snippet: String = first_line.chars().take(width).collect();
    if first_line.chars().count() > width {
        snippet.push('…');
    }
    snippet
}
