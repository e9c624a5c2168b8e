//! Application state
//!
//! Single source of truth for the shell. All transitions happen through the
//! reducer (see `reducer.rs`).

use libsocialcmd::draft::PostDraft;
use libsocialcmd::service::Toast;
use libsocialcmd::types::{search, QueueTab};
use libsocialcmd::validation::{submit_blockers, validate, SubmitBlocker, ValidationResult};
use libsocialcmd::{Platform, PlatformId, PostId, QueuedPost};

use super::actions::{Effect, View};

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,

    pub current_view: View,

    pub focus: Focus,

    pub help_visible: bool,

    /// Error overlay state
    pub error: Option<String>,

    pub dark_mode: bool,

    pub compose: ComposeState,

    pub queue: QueueState,

    /// Post awaiting delete confirmation
    pub confirm_delete: Option<PostId>,

    /// Newest last
    pub toasts: Vec<ActiveToast>,

    /// Side effects requested by the reducer, drained by the event loop
    pub effects: Vec<Effect>,

    pub config: UiConfig,
}

/// Which panel receives keystrokes on the compose view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Destinations,
    Content,
    Schedule,
    Media,
    Queue,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Destinations,
        Focus::Content,
        Focus::Schedule,
        Focus::Media,
        Focus::Queue,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Free-text fields swallow printable keys
    pub fn is_text_input(self) -> bool {
        matches!(self, Focus::Content | Focus::Schedule | Focus::Media)
    }
}

/// Compose form state
#[derive(Debug, Clone)]
pub struct ComposeState {
    pub draft: PostDraft,

    /// Recomputed on every draft change
    pub validation: ValidationResult,

    /// Raw schedule text as typed
    pub schedule_input: String,

    /// Set while `schedule_input` does not parse
    pub schedule_error: Option<String>,

    pub media_input: String,

    /// Truncate the preview to the preview platform's limit
    pub sync_all: bool,

    /// Index into the selected platforms
    pub preview_index: usize,

    /// A submission is waiting on the backend
    pub submitting: bool,
}

/// Queue panel state
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    /// Last snapshot received from the poll loop
    pub posts: Vec<QueuedPost>,

    pub tab: QueueTab,

    pub search: String,

    /// Keystrokes go to the search box
    pub searching: bool,

    /// Index into `visible()`
    pub selected: usize,

    /// The last poll failed; cleared by the next successful one
    pub stale: bool,

    /// At least one poll has completed
    pub loaded: bool,
}

/// A toast with its remaining lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveToast {
    pub toast: Toast,
    pub ticks_left: u32,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,

    /// Toast lifetime in ticks
    pub toast_ticks: u32,

    /// Platforms selected on a fresh draft
    pub default_platforms: Vec<PlatformId>,
}

/// How long a toast stays on screen
const TOAST_MILLIS: u64 = 3000;

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("SOCIALCMD_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ms: &u64| *ms > 0)
            .unwrap_or(100);

        Self {
            colors_enabled,
            tick_rate_ms,
            toast_ticks: (TOAST_MILLIS / tick_rate_ms).max(1) as u32,
            default_platforms: vec![libsocialcmd::draft::DEFAULT_PLATFORM],
        }
    }
}

impl ComposeState {
    pub fn new(draft: PostDraft, sync_all: bool) -> Self {
        let validation = validate(&draft);
        Self {
            draft,
            validation,
            schedule_input: String::new(),
            schedule_error: None,
            media_input: String::new(),
            sync_all,
            preview_index: 0,
            submitting: false,
        }
    }

    /// Reasons the draft cannot be submitted yet
    pub fn blockers(&self) -> Vec<SubmitBlocker> {
        submit_blockers(&self.draft, &self.validation)
    }

    /// Platform whose preview is shown, if any is selected
    pub fn preview_platform(&self) -> Option<&'static Platform> {
        let platforms = self.draft.platforms();
        if platforms.is_empty() {
            return None;
        }
        Some(platforms[self.preview_index % platforms.len()].platform())
    }
}

impl Default for ComposeState {
    fn default() -> Self {
        Self::new(PostDraft::new(), true)
    }
}

impl QueueState {
    /// Posts on the current tab matching the search
    pub fn visible(&self) -> Vec<&QueuedPost> {
        search(&self.posts, &self.search)
            .into_iter()
            .filter(|p| self.tab.includes(p.status))
            .collect()
    }

    pub fn selected_post(&self) -> Option<&QueuedPost> {
        self.visible().get(self.selected).copied()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(UiConfig::default(), true)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a fresh session with the given UI settings
    pub fn with_config(config: UiConfig, sync_all: bool) -> Self {
        let draft = PostDraft::with_platforms(config.default_platforms.iter().copied());
        Self {
            should_quit: false,
            current_view: View::Compose,
            focus: Focus::Content,
            help_visible: false,
            error: None,
            dark_mode: true,
            compose: ComposeState::new(draft, sync_all),
            queue: QueueState::default(),
            confirm_delete: None,
            toasts: Vec::new(),
            effects: Vec::new(),
            config,
        }
    }

    /// Submission control is enabled
    pub fn can_submit(&self) -> bool {
        !self.compose.submitting && self.compose.blockers().is_empty()
    }

    /// A modal or overlay is capturing input
    pub fn has_overlay(&self) -> bool {
        self.help_visible || self.error.is_some() || self.confirm_delete.is_some()
    }

    /// Keystrokes should go to the content editor
    pub fn editing_content(&self) -> bool {
        self.current_view == View::Compose
            && self.focus == Focus::Content
            && !self.has_overlay()
            && !self.compose.submitting
    }
}
