//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. Service events arrive
//! wrapped in `Action::Service` and are folded in by the reducer like any
//! other input.

use crossterm::event::KeyEvent;
use libsocialcmd::service::Event;
use libsocialcmd::{PlatformId, PostDraft, PostId};

/// Actions that trigger state transitions
#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick; ages toasts
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    NavigateTo(View),

    Quit,

    ToggleHelp,

    ToggleTheme,

    /// Move keyboard focus to the next (or previous) panel
    FocusNext,
    FocusPrev,

    // === Compose ===
    /// Editor content changed
    ContentChanged(String),

    TogglePlatform(PlatformId),

    ScheduleInput(String),

    MediaInput(String),

    ToggleSync,

    /// Show the preview for the next selected platform
    CyclePreview,

    /// User asked to submit the draft
    SubmitRequested,

    // === Queue ===
    SelectNext,
    SelectPrev,
    ToggleQueueTab,
    SearchChanged(String),
    ToggleSearch,
    RefreshRequested,

    /// Open the confirmation modal for the selected post
    DeleteRequested,
    DeleteConfirmed,
    DeleteDeclined,

    // === Service ===
    /// Event from the service layer
    Service(Event),

    /// A request could not even be sent (validation, in-flight, bad schedule)
    SubmitRejected(String),

    // === Error Handling ===
    ShowError(String),

    DismissError,
}

/// Top-level destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Compose form, live preview and queue
    Compose,
    Calendar,
    Analytics,
    Library,
    Settings,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Compose,
        View::Calendar,
        View::Analytics,
        View::Library,
        View::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Compose => "Compose",
            View::Calendar => "Calendar",
            View::Analytics => "Analytics",
            View::Library => "Library",
            View::Settings => "Settings",
        }
    }
}

/// Work the event loop must do on behalf of the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Submit(PostDraft),
    Delete(PostId),
    Refresh,
}
