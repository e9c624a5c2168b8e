//! Live preview of the draft as one platform will show it

use libsocialcmd::validation::sync_preview;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::Theme;
use crate::app::AppState;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let compose = &state.compose;

    let Some(platform) = compose.preview_platform() else {
        let empty = Paragraph::new(Span::styled(
            "Select a destination to see a preview",
            Style::default().fg(theme.muted),
        ))
        .block(Block::default().title(" Preview ").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let content = sync_preview(&compose.draft.content, platform, compose.sync_all);
    let truncated = content.chars().count() < compose.draft.content.chars().count();

    let color = theme.platform(platform);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", platform.icon, platform.display_name),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if content.is_empty() {
        lines.push(Line::from(Span::styled(
            compose.draft.placeholder(),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.extend(content.lines().map(|l| Line::from(l.to_string())));
    }

    if let Some(ref media) = compose.draft.media_url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[media] {}", media),
            Style::default().fg(theme.muted),
        )));
    }

    if truncated {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Truncated to {} characters", platform.character_limit),
            Style::default().fg(theme.warning),
        )));
    }

    let title = if compose.draft.platforms().len() > 1 {
        " Preview (p: next platform) "
    } else {
        " Preview "
    };

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(widget, area);
}
