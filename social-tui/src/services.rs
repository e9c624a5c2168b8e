//! Service layer adapter for the TUI
//!
//! Bridges the async `SchedulerService` to the synchronous event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle` owns a tokio runtime and the service
//! - Service events are forwarded from the tokio broadcast channel to a
//!   crossbeam channel the event loop drains every iteration
//! - Submissions and deletions run as spawned tasks; their outcome arrives
//!   as events
//! - The queue poll is started once and shut down exactly once
//!
//! # Example
//!
//! ```no_run
//! use social_tui::services::ServiceHandle;
//! use libsocialcmd::Config;
//!
//! # fn example() -> social_tui::Result<()> {
//! let config = Config::load()?;
//! let mut services = ServiceHandle::new(&config)?;
//! services.start_queue_sync(config.poll_interval()?);
//!
//! for event in services.drain_events() {
//!     println!("{:?}", event);
//! }
//!
//! services.shutdown_queue_sync();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use libsocialcmd::service::{Confirmation, Event, QueueSyncHandle};
use libsocialcmd::{Config, PostDraft, PostId, SchedulerService, SocialCmdError};
use tokio::sync::broadcast::error::RecvError;

use crate::app::Effect;
use crate::error::Result;

/// Service handle for TUI operations
pub struct ServiceHandle {
    service: Arc<SchedulerService>,
    runtime: tokio::runtime::Runtime,
    queue: Option<QueueSyncHandle>,
    event_tx: Sender<Event>,
    event_rx: Receiver<Event>,
}

impl ServiceHandle {
    /// Connect to the backend named in `config`
    pub fn new(config: &Config) -> Result<Self> {
        let service = SchedulerService::from_config(config)?;
        Self::with_service(service)
    }

    /// Wrap an existing service (e.g. one backed by `MockPostsApi`)
    pub fn with_service(service: SchedulerService) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let service = Arc::new(service);
        let (event_tx, event_rx) = unbounded();

        // Bridge tokio broadcast -> crossbeam
        let mut events = service.subscribe();
        let tx = event_tx.clone();
        runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event receiver lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Ok(Self {
            service,
            runtime,
            queue: None,
            event_tx,
            event_rx,
        })
    }

    pub fn events(&self) -> &Receiver<Event> {
        &self.event_rx
    }

    /// Everything received since the last call, without blocking
    pub fn drain_events(&self) -> Vec<Event> {
        self.event_rx.try_iter().collect()
    }

    /// Start polling; a second call while running is ignored
    pub fn start_queue_sync(&mut self, interval: Duration) {
        if self.queue.is_some() {
            return;
        }
        let _guard = self.runtime.enter();
        self.queue = Some(self.service.start_queue_sync(interval));
    }

    pub fn queue_sync_running(&self) -> bool {
        self.queue.as_ref().is_some_and(|q| q.is_running())
    }

    /// Stop polling and wait for the poll task to exit
    pub fn shutdown_queue_sync(&mut self) {
        if let Some(mut queue) = self.queue.take() {
            self.runtime.block_on(queue.shutdown());
        }
    }

    /// Submit in the background; the outcome arrives as an event
    pub fn submit(&self, draft: PostDraft) {
        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();
        self.runtime.spawn(async move {
            match service.submit(&draft).await {
                Ok(created) => tracing::info!(count = created.len(), "Submission completed"),
                // Backend failures are already on the bus
                Err(SocialCmdError::Api(_)) => {}
                Err(e) => {
                    let _ = tx.send(Event::SubmissionFailed {
                        message: e.user_message(libsocialcmd::error::GENERIC_SUBMIT_FAILURE),
                    });
                }
            }
        });
    }

    /// Delete a post the user has already confirmed
    pub fn delete(&self, id: PostId) {
        let service = Arc::clone(&self.service);
        self.runtime.spawn(async move {
            // Failures are reported on the bus as DeletionFailed
            let _ = service.delete(&id, Confirmation::Confirmed).await;
        });
    }

    pub fn refresh(&self) {
        self.service.request_refresh();
    }

    /// Carry out an effect queued by the reducer
    pub fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::Submit(draft) => self.submit(draft),
            Effect::Delete(id) => self.delete(id),
            Effect::Refresh => self.refresh(),
        }
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        self.shutdown_queue_sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libsocialcmd::api::MockPostsApi;
    use libsocialcmd::config::ScheduleZone;
    use libsocialcmd::PlatformId;

    const WAIT: Duration = Duration::from_secs(5);

    fn handle(api: &MockPostsApi) -> ServiceHandle {
        let service = SchedulerService::new(Arc::new(api.clone()), ScheduleZone::Utc);
        ServiceHandle::with_service(service).unwrap()
    }

    #[test]
    fn test_queue_sync_starts_and_stops_once() {
        let api = MockPostsApi::new();
        let mut services = handle(&api);

        services.start_queue_sync(Duration::from_secs(60));
        services.start_queue_sync(Duration::from_secs(60));
        assert!(services.queue_sync_running());

        let event = services.events().recv_timeout(WAIT).unwrap();
        assert!(matches!(event, Event::QueueUpdated { .. }));

        services.shutdown_queue_sync();
        services.shutdown_queue_sync();
        assert!(!services.queue_sync_running());
        assert_eq!(api.list_calls(), 1);
    }

    #[test]
    fn test_submit_reports_through_events() {
        let api = MockPostsApi::new();
        let services = handle(&api);

        let mut draft = PostDraft::with_platforms([PlatformId::Threads]);
        draft.set_content("Hello");
        draft.set_schedule_input("2025-03-01 09:30").unwrap();
        services.submit(draft);

        let event = services.events().recv_timeout(WAIT).unwrap();
        assert!(matches!(event, Event::SubmissionSucceeded { ref created } if created.len() == 1));
    }

    #[test]
    fn test_local_rejection_becomes_failure_event() {
        let api = MockPostsApi::new();
        let services = handle(&api);

        // No schedule: rejected before reaching the backend
        let mut draft = PostDraft::new();
        draft.set_content("Hello");
        services.submit(draft);

        match services.events().recv_timeout(WAIT).unwrap() {
            Event::SubmissionFailed { message } => assert!(message.contains("schedule")),
            other => panic!("Unexpected event {:?}", other),
        }
        assert!(api.created_batches().is_empty());
    }
}
