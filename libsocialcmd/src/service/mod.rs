//! Service layer for SocialCmd
//!
//! Business logic shared by the TUI and the CLI, behind one facade.
//!
//! # Architecture
//!
//! `SchedulerService` owns the backend client, the event bus, and the refresh
//! trigger shared by its sub-services:
//!
//! - `SubmissionService`: draft to batch creation, single-flight
//! - `DeletionService`: confirmed deletion
//! - `QueueSyncLoop`: periodic polling and publish notifications
//! - `EventBus`: event distribution to any number of front ends
//!
//! Submissions and deletions request a queue refresh when they succeed; the
//! running poll loop picks the request up.
//!
//! # Example
//!
//! ```no_run
//! use libsocialcmd::{Config, PlatformId, PostDraft, SchedulerService};
//!
//! # async fn example() -> libsocialcmd::Result<()> {
//! let config = Config::load()?;
//! let service = SchedulerService::from_config(&config)?;
//! let mut queue = service.start_queue_sync(config.poll_interval()?);
//!
//! let mut draft = PostDraft::with_platforms([PlatformId::Twitter]);
//! draft.set_content("Launch!");
//! draft.set_schedule_input("2025-01-01T10:00")?;
//!
//! let created = service.submit(&draft).await?;
//! println!("Scheduled {} posts", created.len());
//!
//! queue.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod deletion;
pub mod events;
pub mod queue;
pub mod submission;

pub use deletion::{Confirmation, DeleteOutcome};
pub use events::{Event, EventBus, Toast, ToastLevel};
pub use queue::{QueueSyncHandle, QueueSyncLoop};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use self::deletion::DeletionService;
use self::submission::SubmissionService;
use crate::api::{HttpPostsApi, PostsApi};
use crate::config::{Config, ScheduleZone};
use crate::draft::PostDraft;
use crate::types::{PostId, QueuedPost};
use crate::Result;

/// Main service facade
pub struct SchedulerService {
    api: Arc<dyn PostsApi>,
    submission: SubmissionService,
    deletion: DeletionService,
    event_bus: EventBus,
    refresh: Arc<Notify>,
}

impl SchedulerService {
    /// Build the service around any backend implementation
    pub fn new(api: Arc<dyn PostsApi>, zone: ScheduleZone) -> Self {
        let event_bus = EventBus::new(100);
        let refresh = Arc::new(Notify::new());

        let submission = SubmissionService::new(
            Arc::clone(&api),
            event_bus.clone(),
            Arc::clone(&refresh),
            zone,
        );
        let deletion = DeletionService::new(Arc::clone(&api), event_bus.clone(), Arc::clone(&refresh));

        Self {
            api,
            submission,
            deletion,
            event_bus,
            refresh,
        }
    }

    /// Build the service against the HTTP backend named in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule zone is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpPostsApi::from_config(config)?;
        Ok(Self::new(Arc::new(api), config.schedule_zone()?))
    }

    pub fn api(&self) -> &Arc<dyn PostsApi> {
        &self.api
    }

    pub fn submission(&self) -> &SubmissionService {
        &self.submission
    }

    pub fn deletion(&self) -> &DeletionService {
        &self.deletion
    }

    /// Subscribe to service events. Multiple subscribers are supported.
    pub fn subscribe(&self) -> events::EventReceiver {
        self.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Ask the running poll loop for an immediate fetch
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// Start polling the queue on the current tokio runtime.
    ///
    /// The caller owns the returned handle and must shut it down (or drop it)
    /// when its view goes away.
    pub fn start_queue_sync(&self, interval: Duration) -> QueueSyncHandle {
        QueueSyncLoop::spawn(
            Arc::clone(&self.api),
            self.event_bus.clone(),
            interval,
            Arc::clone(&self.refresh),
        )
    }

    /// Submit a draft as one batch; see `SubmissionService::submit`
    pub async fn submit(&self, draft: &PostDraft) -> Result<Vec<QueuedPost>> {
        self.submission.submit(draft).await
    }

    /// Delete a post once confirmed; see `DeletionService::delete`
    pub async fn delete(&self, id: &PostId, confirmation: Confirmation) -> Result<DeleteOutcome> {
        self.deletion.delete(id, confirmation).await
    }
}
