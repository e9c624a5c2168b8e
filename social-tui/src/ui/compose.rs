//! Compose form: destinations, content editor, schedule and media fields

use libsocialcmd::validation::StrictestLimit;
use libsocialcmd::PlatformCatalog;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use super::Theme;
use crate::app::{AppState, Focus};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, editor: &TextArea, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Destinations
            Constraint::Min(5),    // Editor
            Constraint::Length(2), // Counter / overflow
            Constraint::Length(3), // Schedule
            Constraint::Length(3), // Media
        ])
        .split(area);

    render_destinations(frame, chunks[0], state, theme);
    frame.render_widget(editor, chunks[1]);
    render_counter(frame, chunks[2], state, theme);
    render_field(
        frame,
        chunks[3],
        " Schedule (YYYY-MM-DD HH:MM) ",
        &state.compose.schedule_input,
        state.compose.schedule_error.as_deref(),
        state.focus == Focus::Schedule,
        theme,
    );
    render_field(
        frame,
        chunks[4],
        " Media URL (optional) ",
        &state.compose.media_input,
        None,
        state.focus == Focus::Media,
        theme,
    );
}

fn render_destinations(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let draft = &state.compose.draft;
    let mut spans = Vec::new();

    for (i, platform) in PlatformCatalog::all().iter().enumerate() {
        let selected = draft.is_selected(platform.id);
        let marker = if selected { "[x]" } else { "[ ]" };
        let mut style = Style::default().fg(theme.platform(platform));
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        } else {
            style = style.add_modifier(Modifier::DIM);
        }
        spans.push(Span::styled(
            format!(" {} {} {} ", i + 1, marker, platform.display_name),
            style,
        ));
    }

    let title = if state.compose.sync_all {
        " Destinations (sync on) "
    } else {
        " Destinations "
    };

    let widget = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(theme.border(state.focus == Focus::Destinations)),
        );
    frame.render_widget(widget, area);
}

fn render_counter(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let validation = &state.compose.validation;

    let count_style = match validation.remaining() {
        Some(n) if n < 0 => Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        Some(n) if n <= 20 => Style::default().fg(theme.warning),
        _ => Style::default().fg(theme.muted),
    };

    let limit = match validation.strictest_limit {
        StrictestLimit::Limit(n) => n.to_string(),
        StrictestLimit::NoLimit => "no limit".to_string(),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {}", validation.char_count), count_style),
        Span::styled(format!(" / {}", limit), Style::default().fg(theme.muted)),
    ])];

    if !validation.overflow.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {}", validation.error_message()),
            Style::default().fg(theme.error),
        )));
    } else if let Some(blocker) = state.compose.blockers().first() {
        lines.push(Line::from(Span::styled(
            format!(" {}", blocker),
            Style::default().fg(theme.muted),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Ready: Ctrl+S to schedule",
            Style::default().fg(theme.success),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    error: Option<&str>,
    focused: bool,
    theme: &Theme,
) {
    let mut block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(theme.border(focused));

    if let Some(error) = error {
        block = block
            .title_bottom(Line::from(format!(" {} ", error)))
            .border_style(Style::default().fg(theme.error));
    }

    let cursor = if focused { "_" } else { "" };
    let text = Paragraph::new(format!("{}{}", value, cursor)).block(block);
    frame.render_widget(text, area);
}
