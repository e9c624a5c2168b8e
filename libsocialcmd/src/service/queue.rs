//! Periodic queue polling with publish notifications
//!
//! `QueueSync` holds the previous snapshot and turns each new fetch result into
//! events. `QueueSyncLoop` drives it from a single tokio task: one fetch right
//! away, then one per interval, plus out-of-cycle fetches on request. Because
//! every fetch is issued and applied by that one task, responses are always
//! applied in the order they were requested.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::events::{Event, EventBus};
use crate::api::PostsApi;
use crate::error::SocialCmdError;
use crate::platform::PlatformCatalog;
use crate::types::{PostId, PostStatus, QueuedPost};

/// Default poll period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Snapshot diffing state
#[derive(Debug, Default)]
pub struct QueueSync {
    previous: Vec<QueuedPost>,
}

impl QueueSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully fetched queue
    pub fn snapshot(&self) -> &[QueuedPost] {
        &self.previous
    }

    /// Apply a successful fetch.
    ///
    /// Returns `QueueUpdated` followed by one `PostPublished` per post that was
    /// pending in the previous snapshot and is published in `next`. The
    /// snapshot is replaced unconditionally.
    pub fn apply(&mut self, next: Vec<QueuedPost>) -> Vec<Event> {
        let before: HashMap<&PostId, PostStatus> =
            self.previous.iter().map(|p| (&p.id, p.status)).collect();

        let published: Vec<Event> = next
            .iter()
            .filter(|post| {
                post.status == PostStatus::Published
                    && before.get(&post.id) == Some(&PostStatus::Pending)
            })
            .map(|post| Event::PostPublished {
                post_id: post.id.clone(),
                platform: post.platform.clone(),
                platform_name: PlatformCatalog::display_name_for(&post.platform),
            })
            .collect();

        self.previous = next.clone();

        let mut events = Vec::with_capacity(published.len() + 1);
        events.push(Event::QueueUpdated { posts: next });
        events.extend(published);
        events
    }

    /// Record a failed fetch; the snapshot is left as it was
    pub fn fail(&self, error: &SocialCmdError) -> Event {
        Event::QueueFetchFailed {
            error: error.to_string(),
        }
    }
}

/// Spawner for the polling task
pub struct QueueSyncLoop;

impl QueueSyncLoop {
    /// Start polling on the current tokio runtime.
    ///
    /// `refresh` requests an immediate out-of-cycle fetch; a request made while
    /// a fetch is running is served right after it.
    pub fn spawn(
        api: Arc<dyn PostsApi>,
        bus: EventBus,
        interval: Duration,
        refresh: Arc<Notify>,
    ) -> QueueSyncHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(api, bus, interval, Arc::clone(&refresh), shutdown_rx));

        info!(interval = ?interval, "Queue sync started");

        QueueSyncHandle {
            refresh,
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run(
    api: Arc<dyn PostsApi>,
    bus: EventBus,
    interval: Duration,
    refresh: Arc<Notify>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut sync = QueueSync::new();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => debug!("Scheduled queue fetch"),
            _ = refresh.notified() => debug!("Out-of-cycle queue fetch"),
        }

        let result = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            result = api.list_posts() => result,
        };

        match result {
            Ok(posts) => {
                for event in sync.apply(posts) {
                    if let Event::PostPublished { post_id, platform, .. } = &event {
                        info!(post_id = %post_id, platform = %platform, "Post published");
                    }
                    bus.emit(event);
                }
            }
            Err(e) => {
                // Silent for the user; the next tick retries
                warn!(error = %e, "Queue fetch failed");
                bus.emit(sync.fail(&e));
            }
        }
    }

    debug!("Queue sync stopped");
}

/// Owner of a running poll task
pub struct QueueSyncHandle {
    refresh: Arc<Notify>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl QueueSyncHandle {
    /// Ask for a fetch now, outside the regular schedule
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop polling and wait for the task to exit.
    ///
    /// An in-flight fetch is abandoned and its result never emitted. Calling
    /// this more than once is a no-op.
    pub async fn shutdown(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        let _ = self.shutdown.send(true);
        if let Err(e) = task.await {
            if !e.is_cancelled() {
                warn!(error = %e, "Queue sync task ended abnormally");
            }
        }
        info!("Queue sync shut down");
    }
}

impl Drop for QueueSyncHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = self.shutdown.send(true);
            task.abort();
        }
    }
}
