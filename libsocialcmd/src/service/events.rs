//! Event system for queue and submission notifications
//!
//! Services emit events on a `tokio::sync::broadcast` channel. Emitting never
//! blocks: with no subscribers the event is dropped, and lagging subscribers
//! lose the oldest events first.
//!
//! # Example
//!
//! ```no_run
//! use libsocialcmd::service::events::{Event, EventBus};
//! use libsocialcmd::PostId;
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::PostDeleted {
//!     post_id: PostId::from(7),
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{PostId, QueuedPost};

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Event bus for distributing service events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus buffering `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: Event) {
        // send() only fails when nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events emitted by the queue sync loop and the submission/deletion flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A fetch succeeded; carries the full new snapshot
    QueueUpdated { posts: Vec<QueuedPost> },

    /// A fetch failed; the previous snapshot is kept
    QueueFetchFailed { error: String },

    /// A post moved from pending to published between two polls
    PostPublished {
        post_id: PostId,
        /// Raw platform id as reported by the backend
        platform: String,
        /// Display name, or the raw id for platforms this client does not know
        platform_name: String,
    },

    /// A batch creation call succeeded
    SubmissionSucceeded { created: Vec<QueuedPost> },

    /// A batch creation call failed
    SubmissionFailed { message: String },

    PostDeleted { post_id: PostId },

    DeletionFailed { post_id: PostId, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

/// A transient user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

impl Event {
    /// Notification to show for this event, if any.
    ///
    /// Queue fetch results never produce a toast; poll failures would repeat
    /// every interval.
    pub fn toast(&self) -> Option<Toast> {
        match self {
            Event::PostPublished { platform_name, .. } => {
                Some(Toast::success(format!("Post published to {}!", platform_name)))
            }
            Event::SubmissionSucceeded { .. } => Some(Toast::success("Posts scheduled successfully!")),
            Event::SubmissionFailed { message } => Some(Toast::error(message.clone())),
            Event::DeletionFailed { message, .. } => Some(Toast::error(message.clone())),
            Event::PostDeleted { .. } => Some(Toast::success("Post deleted")),
            Event::QueueUpdated { .. } | Event::QueueFetchFailed { .. } => None,
        }
    }
}
