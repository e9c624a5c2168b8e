//! UI rendering
//!
//! Rendering functions transform state into terminal frames and have no side
//! effects. The content editor is the one stateful widget; the event loop owns
//! it and passes it in.

pub mod compose;
pub mod preview;
pub mod queue;

use libsocialcmd::service::ToastLevel;
use libsocialcmd::Platform;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use crate::app::{AppState, View};

/// Palette derived from the theme flag and `NO_COLOR`
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub focus: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    colors: bool,
}

impl Theme {
    pub fn for_state(state: &AppState) -> Self {
        if !state.config.colors_enabled {
            return Self {
                fg: Color::Reset,
                bg: Color::Reset,
                muted: Color::Reset,
                accent: Color::Reset,
                focus: Color::Reset,
                success: Color::Reset,
                error: Color::Reset,
                warning: Color::Reset,
                colors: false,
            };
        }
        if state.dark_mode {
            Self {
                fg: Color::Rgb(0xe5, 0xe7, 0xeb),
                bg: Color::Rgb(0x11, 0x18, 0x27),
                muted: Color::Rgb(0x6b, 0x72, 0x80),
                accent: Color::Rgb(0x81, 0x8c, 0xf8),
                focus: Color::Rgb(0x60, 0xa5, 0xfa),
                success: Color::Rgb(0x34, 0xd3, 0x99),
                error: Color::Rgb(0xf8, 0x71, 0x71),
                warning: Color::Rgb(0xfb, 0xbf, 0x24),
                colors: true,
            }
        } else {
            Self {
                fg: Color::Rgb(0x11, 0x18, 0x27),
                bg: Color::Rgb(0xf9, 0xfa, 0xfb),
                muted: Color::Rgb(0x6b, 0x72, 0x80),
                accent: Color::Rgb(0x4f, 0x46, 0xe5),
                focus: Color::Rgb(0x25, 0x63, 0xeb),
                success: Color::Rgb(0x05, 0x96, 0x69),
                error: Color::Rgb(0xdc, 0x26, 0x26),
                warning: Color::Rgb(0xd9, 0x77, 0x06),
                colors: true,
            }
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Border style for a panel, highlighted when focused
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.muted)
        }
    }

    /// Brand color of a platform
    pub fn platform(&self, platform: &Platform) -> Color {
        if !self.colors {
            return Color::Reset;
        }
        parse_hex(platform.color).unwrap_or(self.accent)
    }
}

/// `#rrggbb` to an RGB color
pub fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Render the application UI
pub fn render(frame: &mut Frame, state: &AppState, editor: &TextArea) {
    let theme = Theme::for_state(state);
    let area = frame.area();

    frame.render_widget(Block::default().style(theme.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Navigation
            Constraint::Min(10),   // View
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_nav(frame, chunks[0], state, &theme);

    match state.current_view {
        View::Compose => render_compose_view(frame, chunks[1], state, editor, &theme),
        other => render_placeholder(frame, chunks[1], other.title(), &theme),
    }

    render_status_bar(frame, chunks[2], state, &theme);
    render_toasts(frame, area, state, &theme);

    if let Some(ref id) = state.confirm_delete {
        render_confirm_overlay(frame, area, id.as_str(), &theme);
    }

    if state.help_visible {
        render_help_overlay(frame, area, &theme);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error, &theme);
    }
}

fn render_nav(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![Span::styled(
        " SocialCmd ",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )];

    for (i, view) in View::ALL.iter().enumerate() {
        let label = format!(" F{} {} ", i + 2, view.title());
        let style = if *view == state.current_view {
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::styled(label, style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_compose_view(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    editor: &TextArea,
    theme: &Theme,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(columns[1]);

    compose::render(frame, columns[0], state, editor, theme);
    preview::render(frame, right[0], state, theme);
    queue::render(frame, right[1], state, theme);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let queue = if !state.queue.loaded {
        Span::styled("queue: loading", Style::default().fg(theme.muted))
    } else if state.queue.stale {
        Span::styled("queue: offline", Style::default().fg(theme.warning))
    } else {
        Span::styled(
            format!("queue: {} posts", state.queue.posts.len()),
            Style::default().fg(theme.muted),
        )
    };

    let hints = if state.compose.submitting {
        "Scheduling..."
    } else {
        "Tab: focus | Ctrl+S: schedule | F1: help | Ctrl+T: theme | Ctrl+Q: quit"
    };

    let line = Line::from(vec![
        Span::raw(" "),
        queue,
        Span::raw(" | "),
        Span::styled(hints, Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Views whose data is not available in the terminal client
fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(theme.border(false));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} is not available in the terminal client", title),
            Style::default().fg(theme.warning),
        )),
        Line::from(""),
        Line::from("Press F2 to return to Compose"),
    ])
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(text, area);
}

fn render_toasts(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let width = 44.min(area.width);
    let mut y = area.bottom().saturating_sub(2);

    for active in state.toasts.iter().rev() {
        if y < area.top() + 3 {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y: y - 3,
            width,
            height: 3,
        };
        let color = match active.toast.level {
            ToastLevel::Success => theme.success,
            ToastLevel::Error => theme.error,
        };
        let toast = Paragraph::new(active.toast.message.as_str())
            .style(theme.base().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(Clear, rect);
        frame.render_widget(toast, rect);
        y -= 3;
    }
}

fn render_confirm_overlay(frame: &mut Frame, area: Rect, post_id: &str, theme: &Theme) {
    let popup_area = centered_rect(50, 25, area);

    let text = vec![
        Line::from(""),
        Line::from(libsocialcmd::service::deletion::DELETE_PROMPT),
        Line::from(Span::styled(
            format!("Post #{}", post_id),
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from("y: delete | n / Esc: keep"),
    ];

    let widget = Paragraph::new(text)
        .style(theme.base())
        .block(
            Block::default()
                .title(" Delete post ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.warning)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(widget, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Global:"),
        Line::from("  Ctrl+Q     - Quit"),
        Line::from("  F1         - Toggle help"),
        Line::from("  F2-F6      - Compose, Calendar, Analytics, Library, Settings"),
        Line::from("  Ctrl+T     - Toggle dark/light theme"),
        Line::from("  Tab        - Next panel"),
        Line::from(""),
        Line::from("Compose:"),
        Line::from("  Alt+1..4   - Toggle LinkedIn, X, Threads, Facebook"),
        Line::from("  1..4       - Same, on the destinations panel"),
        Line::from("  y / p      - Sync preview / next preview platform"),
        Line::from("  Ctrl+S     - Schedule (when valid)"),
        Line::from(""),
        Line::from("Queue:"),
        Line::from("  j/k        - Select"),
        Line::from("  t          - Upcoming / history"),
        Line::from("  /          - Search"),
        Line::from("  d          - Delete selected"),
        Line::from("  r, Ctrl+R  - Refresh"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .style(theme.base())
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focus)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str, theme: &Theme) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .style(theme.base())
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Helper to create centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
