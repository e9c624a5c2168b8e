//! Turning a draft into queued posts

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{info, warn};

use super::events::{Event, EventBus};
use crate::api::PostsApi;
use crate::config::ScheduleZone;
use crate::draft::PostDraft;
use crate::error::{Result, SocialCmdError, GENERIC_SUBMIT_FAILURE};
use crate::types::{CreatePostRequest, PostStatus, QueuedPost};
use crate::validation::{submit_blockers, validate, SubmitBlocker};

/// One creation request per selected platform, in selection order.
///
/// All requests share the content, media URL and schedule instant; the local
/// schedule is converted to UTC through `zone`.
pub fn build_requests(draft: &PostDraft, zone: ScheduleZone) -> Result<Vec<CreatePostRequest>> {
    let scheduled_at = draft
        .scheduled_at
        .ok_or_else(|| SocialCmdError::Validation(vec![SubmitBlocker::MissingSchedule]))?;
    let scheduled_at = zone.to_utc(scheduled_at)?;
    let media_url = draft.media_url.clone().unwrap_or_default();

    Ok(draft
        .platforms()
        .iter()
        .map(|platform| CreatePostRequest {
            content: draft.content.clone(),
            platform: *platform,
            scheduled_at,
            media_url: media_url.clone(),
            status: PostStatus::Pending,
        })
        .collect())
}

/// Clears the in-flight flag however the submission ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Batch submission with a single-flight guard
#[derive(Clone)]
pub struct SubmissionService {
    api: Arc<dyn PostsApi>,
    event_bus: EventBus,
    refresh: Arc<Notify>,
    zone: ScheduleZone,
    in_flight: Arc<AtomicBool>,
}

impl SubmissionService {
    pub fn new(
        api: Arc<dyn PostsApi>,
        event_bus: EventBus,
        refresh: Arc<Notify>,
        zone: ScheduleZone,
    ) -> Self {
        Self {
            api,
            event_bus,
            refresh,
            zone,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently waiting on the backend
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit `draft` as one batch.
    ///
    /// The draft is not touched; on success the caller resets it. The queue
    /// is refreshed after a successful submission.
    ///
    /// # Errors
    ///
    /// - `Validation` when the draft has blockers (nothing is sent)
    /// - `SubmitInFlight` when another submission has not finished
    /// - `InvalidInput` when the schedule does not exist in the zone
    /// - `Api` when the backend call fails; `SubmissionFailed` is emitted with
    ///   the backend's message or the generic failure text
    pub async fn submit(&self, draft: &PostDraft) -> Result<Vec<QueuedPost>> {
        let blockers = submit_blockers(draft, &validate(draft));
        if !blockers.is_empty() {
            return Err(SocialCmdError::Validation(blockers));
        }

        let _guard = InFlight::acquire(&self.in_flight).ok_or(SocialCmdError::SubmitInFlight)?;

        let requests = build_requests(draft, self.zone)?;
        let batch_id = uuid::Uuid::new_v4();
        let platforms: Vec<&str> = requests.iter().map(|r| r.platform.as_str()).collect();
        info!(batch_id = %batch_id, platforms = ?platforms, "Submitting post");

        match self.api.create_posts(&requests).await {
            Ok(created) => {
                info!(batch_id = %batch_id, created = created.len(), "Posts scheduled");
                self.event_bus.emit(Event::SubmissionSucceeded {
                    created: created.clone(),
                });
                self.refresh.notify_one();
                Ok(created)
            }
            Err(e) => {
                warn!(batch_id = %batch_id, error = %e, "Submission failed");
                self.event_bus.emit(Event::SubmissionFailed {
                    message: e.user_message(GENERIC_SUBMIT_FAILURE),
                });
                Err(e)
            }
        }
    }
}
