//! Queue panel: upcoming and published posts

use chrono::Local;
use libsocialcmd::{PlatformCatalog, PostStatus, QueuedPost};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::Theme;
use crate::app::{AppState, Focus};

/// Preview length of a post in the list
const SNIPPET_CHARS: usize = 40;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let queue = &state.queue;
    let focused = state.focus == Focus::Queue;

    let block = Block::default()
        .title(format!(" Queue: {} (t to switch) ", queue.tab.label()))
        .borders(Borders::ALL)
        .border_style(theme.border(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let search_style = if queue.searching {
        Style::default().fg(theme.focus)
    } else {
        Style::default().fg(theme.muted)
    };
    let search = if queue.search.is_empty() && !queue.searching {
        "/ to search".to_string()
    } else {
        format!("search: {}{}", queue.search, if queue.searching { "_" } else { "" })
    };
    frame.render_widget(Paragraph::new(Span::styled(search, search_style)), chunks[0]);

    let visible = queue.visible();
    if visible.is_empty() {
        let message = if !queue.loaded {
            "Loading queue..."
        } else if queue.stale {
            "Backend unreachable, retrying"
        } else {
            "No posts"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.muted))),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|post| post_item(post, theme)).collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(queue.selected.min(visible.len() - 1)));
    }
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn post_item<'a>(post: &QueuedPost, theme: &Theme) -> ListItem<'a> {
    let platform_name = PlatformCatalog::display_name_for(&post.platform);
    let platform_color = PlatformCatalog::lookup(&post.platform)
        .map(|p| theme.platform(p))
        .unwrap_or(theme.muted);

    let (status, status_color) = match post.status {
        PostStatus::Pending => ("pending", theme.warning),
        PostStatus::Published => ("published", theme.success),
        PostStatus::Failed => ("failed", theme.error),
    };

    let when = post
        .scheduled_at
        .with_timezone(&Local)
        .format("%b %d %H:%M")
        .to_string();

    let mut snippet: String = post.content.chars().take(SNIPPET_CHARS).collect();
    if post.content.chars().count() > SNIPPET_CHARS {
        snippet.push_str("...");
    }
    let snippet = snippet.replace('\n', " ");

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(when, Style::default().fg(theme.muted)),
            Span::raw("  "),
            Span::styled(platform_name, Style::default().fg(platform_color)),
            Span::raw("  "),
            Span::styled(status, Style::default().fg(status_color)),
        ]),
        Line::from(format!("  {}", snippet)),
    ])
}
