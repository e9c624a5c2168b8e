//! Draft validation
//!
//! Everything here is a pure function of the draft and the static platform
//! catalog, cheap enough to rerun on every keystroke and platform toggle.
//!
//! # Example
//!
//! ```
//! use libsocialcmd::{PostDraft, PlatformId, validate};
//!
//! let mut draft = PostDraft::with_platforms([PlatformId::Twitter, PlatformId::LinkedIn]);
//! draft.set_content("a".repeat(300));
//!
//! let result = validate(&draft);
//! assert!(result.is_blocking);
//! assert_eq!(result.overflow.len(), 1);
//! assert_eq!(result.overflow[0].platform_name, "X (Twitter)");
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::draft::PostDraft;
use crate::platform::{Platform, PlatformId};

/// A selected platform whose limit the content exceeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overflow {
    pub platform: PlatformId,
    pub platform_name: String,
    pub limit: usize,
}

/// Tightest limit among the selected platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrictestLimit {
    Limit(usize),
    /// Nothing is selected
    NoLimit,
}

impl fmt::Display for StrictestLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrictestLimit::Limit(n) => write!(f, "{}", n),
            StrictestLimit::NoLimit => f.write_str("no limit"),
        }
    }
}

/// Derived view of a draft, recomputed on every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub char_count: usize,
    /// Overflowing platforms in selection order
    pub overflow: Vec<Overflow>,
    pub is_blocking: bool,
    pub strictest_limit: StrictestLimit,
}

impl ValidationResult {
    /// Characters left under the strictest limit (negative when over)
    pub fn remaining(&self) -> Option<i64> {
        match self.strictest_limit {
            StrictestLimit::Limit(limit) => Some(limit as i64 - self.char_count as i64),
            StrictestLimit::NoLimit => None,
        }
    }

    /// "Too long for X (Twitter), Threads", or empty when nothing overflows
    pub fn error_message(&self) -> String {
        if self.overflow.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = self
            .overflow
            .iter()
            .map(|o| o.platform_name.as_str())
            .collect();
        format!("Too long for {}", names.join(", "))
    }
}

/// Validate a draft against the limits of its selected platforms
pub fn validate(draft: &PostDraft) -> ValidationResult {
    let char_count = draft.content.chars().count();

    let overflow: Vec<Overflow> = draft
        .platforms()
        .iter()
        .map(|id| id.platform())
        .filter(|p| char_count > p.character_limit)
        .map(|p| Overflow {
            platform: p.id,
            platform_name: p.display_name.to_string(),
            limit: p.character_limit,
        })
        .collect();

    let strictest_limit = draft
        .platforms()
        .iter()
        .map(|id| id.platform().character_limit)
        .min()
        .map(StrictestLimit::Limit)
        .unwrap_or(StrictestLimit::NoLimit);

    let is_blocking = !overflow.is_empty() || draft.platforms().is_empty();

    ValidationResult {
        char_count,
        overflow,
        is_blocking,
        strictest_limit,
    }
}

/// Preview copy of the content for one platform.
///
/// With sync enabled the text is cut to the platform's limit (by characters).
/// The draft itself is never modified.
pub fn sync_preview<'a>(content: &'a str, platform: &Platform, sync_enabled: bool) -> Cow<'a, str> {
    if !sync_enabled {
        return Cow::Borrowed(content);
    }
    match content.char_indices().nth(platform.character_limit) {
        Some((byte_idx, _)) => Cow::Owned(content[..byte_idx].to_string()),
        None => Cow::Borrowed(content),
    }
}

/// Reason a draft cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocker {
    EmptyContent,
    MissingSchedule,
    NoPlatforms,
    Overflow(Vec<Overflow>),
}

impl fmt::Display for SubmitBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitBlocker::EmptyContent => f.write_str("Content cannot be empty"),
            SubmitBlocker::MissingSchedule => f.write_str("Pick a schedule time"),
            SubmitBlocker::NoPlatforms => f.write_str("Select at least one destination"),
            SubmitBlocker::Overflow(overflow) => {
                let parts: Vec<String> = overflow
                    .iter()
                    .map(|o| format!("{} (limit {})", o.platform_name, o.limit))
                    .collect();
                write!(f, "Too long for {}", parts.join(", "))
            }
        }
    }
}

/// Everything standing between the draft and a submission; empty means go
pub fn submit_blockers(draft: &PostDraft, result: &ValidationResult) -> Vec<SubmitBlocker> {
    let mut blockers = Vec::new();

    if draft.content.is_empty() {
        blockers.push(SubmitBlocker::EmptyContent);
    }
    if draft.scheduled_at.is_none() {
        blockers.push(SubmitBlocker::MissingSchedule);
    }
    if draft.platforms().is_empty() {
        blockers.push(SubmitBlocker::NoPlatforms);
    }
    if !result.overflow.is_empty() {
        blockers.push(SubmitBlocker::Overflow(result.overflow.clone()));
    }

    blockers
}
