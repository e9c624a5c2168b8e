//! The post being composed
//!
//! A `PostDraft` is owned by whatever front end is composing it. It is never
//! sent to the backend as-is; submission turns it into one creation request
//! per selected platform (see `service::submission`).

use chrono::NaiveDateTime;

use crate::error::{Result, SocialCmdError};
use crate::platform::{PlatformCatalog, PlatformId};

/// Accepted layouts for a local schedule, most specific first
const SCHEDULE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Platform selected on a fresh draft
pub const DEFAULT_PLATFORM: PlatformId = PlatformId::LinkedIn;

/// In-progress post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub content: String,
    /// Selected destinations in the order they were picked, without duplicates
    platforms: Vec<PlatformId>,
    /// Wall-clock time in the composer's zone
    pub scheduled_at: Option<NaiveDateTime>,
    pub media_url: Option<String>,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self {
            content: String::new(),
            platforms: vec![DEFAULT_PLATFORM],
            scheduled_at: None,
            media_url: None,
        }
    }
}

impl PostDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft with an explicit initial selection (duplicates are dropped)
    pub fn with_platforms(platforms: impl IntoIterator<Item = PlatformId>) -> Self {
        let mut draft = Self {
            platforms: Vec::new(),
            ..Self::default()
        };
        for id in platforms {
            if !draft.is_selected(id) {
                draft.platforms.push(id);
            }
        }
        draft
    }

    pub fn platforms(&self) -> &[PlatformId] {
        &self.platforms
    }

    pub fn is_selected(&self, id: PlatformId) -> bool {
        self.platforms.contains(&id)
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Add the platform if absent, remove it if present
    pub fn toggle_platform(&mut self, id: PlatformId) {
        if let Some(pos) = self.platforms.iter().position(|p| *p == id) {
            self.platforms.remove(pos);
        } else {
            self.platforms.push(id);
        }
    }

    pub fn set_schedule(&mut self, scheduled_at: Option<NaiveDateTime>) {
        self.scheduled_at = scheduled_at;
    }

    /// Parse a local date-time the way a `datetime-local` input produces it.
    ///
    /// Blank input clears the schedule. On a parse failure the previous
    /// schedule is left untouched.
    pub fn set_schedule_input(&mut self, input: &str) -> Result<()> {
        self.scheduled_at = parse_schedule(input)?;
        Ok(())
    }

    /// Blank input clears the media URL
    pub fn set_media_url(&mut self, url: &str) {
        let trimmed = url.trim();
        self.media_url = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Back to the state of a fresh draft
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Prompt text for the content editor
    pub fn placeholder(&self) -> String {
        if self.platforms.is_empty() {
            return "Select a destination above...".to_string();
        }
        let names: Vec<&str> = self
            .platforms
            .iter()
            .map(|id| PlatformCatalog::get(*id).display_name)
            .collect();
        format!("What's happening on {}?", names.join(", "))
    }
}

/// Parse a schedule string; `Ok(None)` for blank input
pub fn parse_schedule(input: &str) -> Result<Option<NaiveDateTime>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    SCHEDULE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(Some)
        .ok_or_else(|| {
            SocialCmdError::InvalidInput(format!(
                "Invalid schedule '{}'. Expected YYYY-MM-DDTHH:MM",
                trimmed
            ))
        })
}
