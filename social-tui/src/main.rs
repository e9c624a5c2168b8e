//! social-tui - Terminal UI for SocialCmd
//!
//! Compose a post once, pick destinations, schedule it, and watch the queue
//! publish it.

use std::path::PathBuf;

use crossterm::event::KeyEvent;
use libsocialcmd::Config;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use social_tui::{
    app::{
        event::{is_shell_key, EventHandler, TuiEvent},
        reduce, Action, AppState, UiConfig,
    },
    error::Result,
    services::ServiceHandle,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui::{self, Theme},
};
use tui_textarea::TextArea;

fn main() -> Result<()> {
    let config = Config::load()?;
    init_logging()?;

    // Install panic hook to restore terminal on panic
    install_panic_hook();

    let ui_config = UiConfig {
        default_platforms: config.default_platforms()?,
        ..UiConfig::default()
    };
    let state = AppState::with_config(ui_config, config.defaults.sync_all);

    let mut services = ServiceHandle::new(&config)?;
    services.start_queue_sync(config.poll_interval()?);

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, state, &services);
    restore_terminal(terminal)?;

    services.shutdown_queue_sync();
    tracing::info!("social-tui exited");

    result
}

/// The terminal belongs to the UI, so logs go to a file
fn init_logging() -> Result<()> {
    let path = match std::env::var("SOCIALCMD_LOG_FILE") {
        Ok(path) => PathBuf::from(path),
        Err(_) => libsocialcmd::config::resolve_data_path()?.join("social-tui.log"),
    };
    libsocialcmd::logging::config_from_env(false)
        .with_file(path)
        .init()?;
    Ok(())
}

fn new_editor(state: &AppState) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(state.compose.draft.placeholder());
    textarea
}

fn style_editor(textarea: &mut TextArea, state: &AppState) {
    let theme = Theme::for_state(state);
    let border = if state.compose.submitting {
        Style::default().fg(theme.warning)
    } else if !state.compose.validation.overflow.is_empty() {
        Style::default().fg(theme.error)
    } else {
        theme.border(state.editing_content())
    };

    textarea.set_style(theme.base());
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text(state.compose.draft.placeholder());
    textarea.set_block(
        Block::default()
            .title(" Content ")
            .borders(Borders::ALL)
            .border_style(border),
    );
}

/// Route a key to the editor or to the reducer
fn key_action(textarea: &mut TextArea, state: &AppState, key: KeyEvent) -> Action {
    if state.editing_content() && !is_shell_key(&key) {
        textarea.input(key);
        Action::ContentChanged(textarea.lines().join("\n"))
    } else {
        Action::Key(key)
    }
}

fn run_app(terminal: &mut Tui, mut state: AppState, services: &ServiceHandle) -> Result<()> {
    let mut textarea = new_editor(&state);
    let event_handler = EventHandler::new(state.config.tick_rate_ms);

    loop {
        style_editor(&mut textarea, &state);
        terminal.draw(|frame| {
            ui::render(frame, &state, &textarea);
        })?;

        let action = match event_handler.next()? {
            TuiEvent::Key(key) => key_action(&mut textarea, &state, key),
            other => other.into(),
        };
        state = reduce(state, action);

        for event in services.drain_events() {
            state = reduce(state, Action::Service(event));
        }

        for effect in std::mem::take(&mut state.effects) {
            services.run_effect(effect);
        }

        // The draft was reset after a successful submission
        if state.compose.draft.content.is_empty() && !textarea.is_empty() {
            textarea = new_editor(&state);
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
