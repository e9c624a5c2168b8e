//! Confirmed deletion of queued posts

use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{debug, info, warn};

use super::events::{Event, EventBus};
use crate::api::PostsApi;
use crate::error::Result;
use crate::types::PostId;

/// Message shown when the backend gives no usable reason
pub const GENERIC_DELETE_FAILURE: &str = "Failed to delete post";

/// Prompt shown before a post is deleted
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this post?";

/// Answer to the deletion prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined; the backend was not contacted
    Cancelled,
}

#[derive(Clone)]
pub struct DeletionService {
    api: Arc<dyn PostsApi>,
    event_bus: EventBus,
    refresh: Arc<Notify>,
}

impl DeletionService {
    pub fn new(api: Arc<dyn PostsApi>, event_bus: EventBus, refresh: Arc<Notify>) -> Self {
        Self {
            api,
            event_bus,
            refresh,
        }
    }

    /// Delete `id` once the user has confirmed.
    ///
    /// On success the queue is refreshed and `PostDeleted` emitted. On failure
    /// `DeletionFailed` is emitted and the cached queue is left as it was.
    pub async fn delete(&self, id: &PostId, confirmation: Confirmation) -> Result<DeleteOutcome> {
        if confirmation == Confirmation::Declined {
            debug!(post_id = %id, "Deletion declined");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.api.delete_post(id).await {
            Ok(()) => {
                info!(post_id = %id, "Post deleted");
                self.refresh.notify_one();
                self.event_bus.emit(Event::PostDeleted { post_id: id.clone() });
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                warn!(post_id = %id, error = %e, "Deletion failed");
                self.event_bus.emit(Event::DeletionFailed {
                    post_id: id.clone(),
                    message: e.user_message(GENERIC_DELETE_FAILURE),
                });
                Err(e)
            }
        }
    }
}
