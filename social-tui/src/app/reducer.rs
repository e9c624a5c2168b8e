//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State`. The reducer performs no I/O: anything that
//! needs the network is queued on `AppState::effects` and executed by the
//! event loop, whose results come back as `Action::Service`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libsocialcmd::draft::{parse_schedule, PostDraft};
use libsocialcmd::service::{Event, Toast};
use libsocialcmd::validation::validate;
use libsocialcmd::PlatformId;

use super::actions::{Action, Effect, View};
use super::state::{ActiveToast, AppState, ComposeState, Focus, QueueState};

/// Destination toggled by the number keys, in catalog order
const PLATFORM_KEYS: [(char, PlatformId); 4] = [
    ('1', PlatformId::LinkedIn),
    ('2', PlatformId::Twitter),
    ('3', PlatformId::Threads),
    ('4', PlatformId::Facebook),
];

const SCHEDULE_HINT: &str = "Expected YYYY-MM-DDTHH:MM";

/// Pure reducer function
///
/// Takes current state and an action, returns new state. Same inputs always
/// produce the same output.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => age_toasts(state),
        Action::Resize(_, _) => state, // Terminal auto-handles resize

        // === Navigation ===
        Action::NavigateTo(view) => AppState {
            current_view: view,
            ..state
        },

        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ToggleHelp => AppState {
            help_visible: !state.help_visible,
            ..state
        },

        Action::ToggleTheme => AppState {
            dark_mode: !state.dark_mode,
            ..state
        },

        Action::FocusNext => AppState {
            focus: state.focus.next(),
            ..state
        },

        Action::FocusPrev => AppState {
            focus: state.focus.prev(),
            ..state
        },

        // === Compose ===
        // The draft is frozen while a submission is in flight; a success resets it
        Action::ContentChanged(_)
        | Action::TogglePlatform(_)
        | Action::ScheduleInput(_)
        | Action::MediaInput(_)
            if state.compose.submitting =>
        {
            state
        }

        Action::ContentChanged(content) => update_draft(state, |draft| draft.set_content(content)),

        Action::TogglePlatform(id) => {
            let mut state = update_draft(state, |draft| draft.toggle_platform(id));
            let selected = state.compose.draft.platforms().len();
            if state.compose.preview_index >= selected {
                state.compose.preview_index = 0;
            }
            state
        }

        Action::ScheduleInput(input) => {
            let (scheduled_at, schedule_error) = match parse_schedule(&input) {
                Ok(parsed) => (parsed, None),
                Err(_) => (None, Some(SCHEDULE_HINT.to_string())),
            };
            let mut state = update_draft(state, |draft| draft.set_schedule(scheduled_at));
            state.compose.schedule_input = input;
            state.compose.schedule_error = schedule_error;
            state
        }

        Action::MediaInput(input) => {
            let mut state = update_draft(state, |draft| draft.set_media_url(&input));
            state.compose.media_input = input;
            state
        }

        Action::ToggleSync => AppState {
            compose: ComposeState {
                sync_all: !state.compose.sync_all,
                ..state.compose
            },
            ..state
        },

        Action::CyclePreview => {
            let selected = state.compose.draft.platforms().len().max(1);
            AppState {
                compose: ComposeState {
                    preview_index: (state.compose.preview_index + 1) % selected,
                    ..state.compose
                },
                ..state
            }
        }

        Action::SubmitRequested => {
            if !state.can_submit() {
                return state;
            }
            let mut state = state;
            state.compose.submitting = true;
            state.effects.push(Effect::Submit(state.compose.draft.clone()));
            state
        }

        // === Queue ===
        Action::SelectNext => {
            let visible = state.queue.visible().len();
            let selected = if visible == 0 {
                0
            } else {
                (state.queue.selected + 1).min(visible - 1)
            };
            with_selected(state, selected)
        }

        Action::SelectPrev => {
            let selected = state.queue.selected.saturating_sub(1);
            with_selected(state, selected)
        }

        Action::ToggleQueueTab => AppState {
            queue: QueueState {
                tab: state.queue.tab.toggle(),
                selected: 0,
                ..state.queue
            },
            ..state
        },

        Action::SearchChanged(search) => AppState {
            queue: QueueState {
                search,
                selected: 0,
                ..state.queue
            },
            ..state
        },

        Action::ToggleSearch => AppState {
            queue: QueueState {
                searching: !state.queue.searching,
                ..state.queue
            },
            ..state
        },

        Action::RefreshRequested => {
            let mut state = state;
            state.effects.push(Effect::Refresh);
            state
        }

        Action::DeleteRequested => {
            let target = state.queue.selected_post().map(|p| p.id.clone());
            match target {
                Some(id) => AppState {
                    confirm_delete: Some(id),
                    ..state
                },
                None => state,
            }
        }

        Action::DeleteConfirmed => {
            let mut state = state;
            if let Some(id) = state.confirm_delete.take() {
                state.effects.push(Effect::Delete(id));
            }
            state
        }

        Action::DeleteDeclined => AppState {
            confirm_delete: None,
            ..state
        },

        // === Service ===
        Action::Service(event) => apply_event(state, event),

        Action::SubmitRejected(message) => {
            let mut state = state;
            state.compose.submitting = false;
            push_toast(state, Toast::error(message))
        }

        // === Error Handling ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },

        Action::DismissError => AppState {
            error: None,
            ..state
        },
    }
}

/// Apply `change` to the draft and recompute validation
fn update_draft(state: AppState, change: impl FnOnce(&mut PostDraft)) -> AppState {
    let mut state = state;
    change(&mut state.compose.draft);
    state.compose.validation = validate(&state.compose.draft);
    state
}

fn with_selected(state: AppState, selected: usize) -> AppState {
    AppState {
        queue: QueueState {
            selected,
            ..state.queue
        },
        ..state
    }
}

fn push_toast(state: AppState, toast: Toast) -> AppState {
    let mut state = state;
    let ticks_left = state.config.toast_ticks;
    state.toasts.push(ActiveToast { toast, ticks_left });
    state
}

fn age_toasts(state: AppState) -> AppState {
    let mut state = state;
    for toast in &mut state.toasts {
        toast.ticks_left = toast.ticks_left.saturating_sub(1);
    }
    state.toasts.retain(|t| t.ticks_left > 0);
    state
}

fn apply_event(state: AppState, event: Event) -> AppState {
    let toast = event.toast();
    let mut state = state;

    match event {
        Event::QueueUpdated { posts } => {
            state.queue.posts = posts;
            state.queue.loaded = true;
            state.queue.stale = false;
            let visible = state.queue.visible().len();
            if state.queue.selected >= visible {
                state.queue.selected = visible.saturating_sub(1);
            }
        }
        Event::QueueFetchFailed { .. } => {
            state.queue.stale = true;
        }
        Event::SubmissionSucceeded { .. } => {
            let draft = PostDraft::with_platforms(state.config.default_platforms.iter().copied());
            state.compose = ComposeState::new(draft, state.compose.sync_all);
        }
        Event::SubmissionFailed { .. } => {
            state.compose.submitting = false;
        }
        Event::PostPublished { .. } | Event::PostDeleted { .. } | Event::DeletionFailed { .. } => {}
    }

    match toast {
        Some(toast) => push_toast(state, toast),
        None => state,
    }
}

/// Handle keyboard input
///
/// Maps keys to high-level actions. This is where keybindings are defined.
fn handle_key(state: AppState, key: KeyEvent) -> AppState {
    // The confirmation modal captures everything
    if state.confirm_delete.is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => reduce(state, Action::DeleteConfirmed),
            KeyCode::Char('n') | KeyCode::Esc => reduce(state, Action::DeleteDeclined),
            _ => state,
        };
    }

    // Global keybindings (work everywhere)
    match (key.code, key.modifiers) {
        // Quitting mid-submission abandons the request with the runtime
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
            return reduce(state, Action::Quit);
        }

        (KeyCode::F(1), _) => return reduce(state, Action::ToggleHelp),

        (KeyCode::Esc, _) if state.error.is_some() => {
            return reduce(state, Action::DismissError);
        }

        (KeyCode::Esc, _) if state.help_visible => {
            return reduce(state, Action::ToggleHelp);
        }

        (KeyCode::F(n), _) if (2..=6).contains(&n) => {
            return reduce(state, Action::NavigateTo(View::ALL[usize::from(n - 2)]));
        }

        (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
            return reduce(state, Action::ToggleTheme);
        }

        _ => {}
    }

    if state.has_overlay() {
        return state;
    }

    match state.current_view {
        View::Compose => handle_compose_key(state, key),
        View::Calendar | View::Analytics | View::Library | View::Settings => state,
    }
}

/// Handle compose-view keys
fn handle_compose_key(state: AppState, key: KeyEvent) -> AppState {
    match (key.code, key.modifiers) {
        (KeyCode::Tab, _) => return reduce(state, Action::FocusNext),
        (KeyCode::BackTab, _) => return reduce(state, Action::FocusPrev),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            return reduce(state, Action::SubmitRequested);
        }
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
            return reduce(state, Action::RefreshRequested);
        }
        (KeyCode::Char(c), KeyModifiers::ALT) => {
            if let Some(id) = platform_for_key(c) {
                return reduce(state, Action::TogglePlatform(id));
            }
        }
        _ => {}
    }

    match state.focus {
        Focus::Destinations => handle_destination_key(state, key),
        // Editor input is routed to the textarea by the event loop
        Focus::Content => state,
        Focus::Schedule => match edit_line(&state.compose.schedule_input, key) {
            Some(input) => reduce(state, Action::ScheduleInput(input)),
            None => state,
        },
        Focus::Media => match edit_line(&state.compose.media_input, key) {
            Some(input) => reduce(state, Action::MediaInput(input)),
            None => state,
        },
        Focus::Queue => handle_queue_key(state, key),
    }
}

fn handle_destination_key(state: AppState, key: KeyEvent) -> AppState {
    match key.code {
        KeyCode::Char('y') => reduce(state, Action::ToggleSync),
        KeyCode::Char('p') => reduce(state, Action::CyclePreview),
        KeyCode::Char(c) => match platform_for_key(c) {
            Some(id) => reduce(state, Action::TogglePlatform(id)),
            None => state,
        },
        _ => state,
    }
}

fn handle_queue_key(state: AppState, key: KeyEvent) -> AppState {
    if state.queue.searching {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => reduce(state, Action::ToggleSearch),
            _ => match edit_line(&state.queue.search, key) {
                Some(search) => reduce(state, Action::SearchChanged(search)),
                None => state,
            },
        };
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => reduce(state, Action::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => reduce(state, Action::SelectPrev),
        KeyCode::Char('t') => reduce(state, Action::ToggleQueueTab),
        KeyCode::Char('/') => reduce(state, Action::ToggleSearch),
        KeyCode::Char('r') => reduce(state, Action::RefreshRequested),
        KeyCode::Char('d') | KeyCode::Delete => reduce(state, Action::DeleteRequested),
        KeyCode::Char('q') => reduce(state, Action::Quit),
        _ => state,
    }
}

fn platform_for_key(c: char) -> Option<PlatformId> {
    PLATFORM_KEYS
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, id)| *id)
}

/// Single-line editing: printable characters append, Backspace removes.
/// Returns the new text, or `None` when the key does not edit.
fn edit_line(current: &str, key: KeyEvent) -> Option<String> {
    match (key.code, key.modifiers) {
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            let mut next = current.to_string();
            next.push(c);
            Some(next)
        }
        (KeyCode::Backspace, _) => {
            let mut next = current.to_string();
            next.pop()?;
            Some(next)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reducer_is_pure() {
        let state = AppState::new();
        let state_clone = state.clone();

        let new_state = reduce(state_clone.clone(), Action::ShowError("boom".to_string()));

        assert!(state_clone.error.is_none());
        assert_eq!(new_state.error, Some("boom".to_string()));
    }

    #[test]
    fn test_quit_action() {
        let state = AppState::new();
        assert!(!state.should_quit);

        let new_state = reduce(state, Action::Quit);
        assert!(new_state.should_quit);
    }

    #[test]
    fn test_content_change_revalidates() {
        let state = AppState::new();
        assert!(!state.can_submit());

        let state = reduce(state, Action::TogglePlatform(PlatformId::Twitter));
        let state = reduce(state, Action::ContentChanged("a".repeat(300)));
        assert_eq!(state.compose.validation.char_count, 300);
        assert!(state.compose.validation.is_blocking);
        assert_eq!(state.compose.validation.error_message(), "Too long for X (Twitter)");
    }

    #[test]
    fn test_invalid_schedule_clears_draft_schedule() {
        let state = reduce(AppState::new(), Action::ScheduleInput("2025-01-01T10:00".to_string()));
        assert!(state.compose.draft.scheduled_at.is_some());
        assert!(state.compose.schedule_error.is_none());

        let state = reduce(state, Action::ScheduleInput("2025-01-01T10:0x".to_string()));
        assert!(state.compose.draft.scheduled_at.is_none());
        assert_eq!(state.compose.schedule_error.as_deref(), Some(SCHEDULE_HINT));
    }

    #[test]
    fn test_toasts_expire() {
        let mut state = AppState::new();
        state.config.toast_ticks = 2;

        let state = reduce(state, Action::SubmitRejected("nope".to_string()));
        assert_eq!(state.toasts.len(), 1);

        let state = reduce(state, Action::Tick);
        assert_eq!(state.toasts.len(), 1);
        let state = reduce(state, Action::Tick);
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn test_draft_frozen_while_submitting() {
        let mut state = AppState::new();
        state.compose.submitting = true;
        let before = state.compose.draft.clone();

        let state = reduce(
            state,
            Action::Key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT)),
        );
        let state = reduce(state, Action::TogglePlatform(PlatformId::Threads));
        let state = reduce(state, Action::ScheduleInput("2025-01-01T10:00".to_string()));
        let state = reduce(state, Action::MediaInput("https://x".to_string()));
        let state = reduce(state, Action::ContentChanged("late edit".to_string()));

        assert_eq!(state.compose.draft, before);
        assert!(state.compose.schedule_input.is_empty());
        assert!(state.compose.media_input.is_empty());
    }

    #[test]
    fn test_draft_editable_after_failed_submission() {
        let mut state = AppState::new();
        state.compose.submitting = true;

        let state = reduce(
            state,
            Action::Service(Event::SubmissionFailed {
                message: "nope".to_string(),
            }),
        );
        let state = reduce(state, Action::TogglePlatform(PlatformId::Twitter));
        assert!(state.compose.draft.is_selected(PlatformId::Twitter));
    }

    #[test]
    fn test_edit_line() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(edit_line("ab", key(KeyCode::Char('c'))), Some("abc".to_string()));
        assert_eq!(edit_line("ab", key(KeyCode::Backspace)), Some("a".to_string()));
        assert_eq!(edit_line("", key(KeyCode::Backspace)), None);
        assert_eq!(edit_line("ab", key(KeyCode::Left)), None);
    }
}
