//! In-memory stand-in for the scheduling backend
//!
//! `MockPostsApi` behaves like a tiny backend: created posts are stored and
//! returned by later list calls, deletes remove them. On top of that tests can
//! script list responses (including failures), inject create/delete failures,
//! add latency, and inspect every call that was made.
//!
//! Clones share state, so a test can hand one clone to the service and keep
//! another for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::sleep;

use super::PostsApi;
use crate::error::{ApiError, Result};
use crate::types::{CreatePostRequest, PostId, PostStatus, QueuedPost};

type ListResponse = std::result::Result<Vec<QueuedPost>, ApiError>;

#[derive(Default)]
struct MockState {
    posts: Vec<QueuedPost>,
    next_id: i64,
    scripted_lists: VecDeque<ListResponse>,
    create_error: Option<ApiError>,
    delete_error: Option<ApiError>,
    delay: Duration,
    list_calls: usize,
    created_batches: Vec<Vec<CreatePostRequest>>,
    deleted: Vec<PostId>,
}

/// Mock backend for tests
#[derive(Clone, Default)]
pub struct MockPostsApi {
    state: Arc<Mutex<MockState>>,
}

impl MockPostsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `posts` already queued
    pub fn with_posts(posts: Vec<QueuedPost>) -> Self {
        let mock = Self::new();
        mock.set_posts(posts);
        mock
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the state from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the stored queue, e.g. to simulate a server-side status change
    pub fn set_posts(&self, posts: Vec<QueuedPost>) {
        let mut state = self.lock();
        state.next_id = posts
            .iter()
            .filter_map(|p| p.id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        state.posts = posts;
    }

    /// Change the status of one stored post
    pub fn set_status(&self, id: &PostId, status: PostStatus) {
        let mut state = self.lock();
        if let Some(post) = state.posts.iter_mut().find(|p| &p.id == id) {
            post.status = status;
        }
    }

    /// Queue a one-off list response; scripted responses take precedence over
    /// the stored posts and are consumed in order
    pub fn push_list_response(&self, response: ListResponse) {
        self.lock().scripted_lists.push_back(response);
    }

    /// Make every create call fail with `error`
    pub fn fail_create(&self, error: ApiError) {
        self.lock().create_error = Some(error);
    }

    /// Make every delete call fail with `error`
    pub fn fail_delete(&self, error: ApiError) {
        self.lock().delete_error = Some(error);
    }

    /// Simulated latency applied to every call
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = delay;
    }

    pub fn posts(&self) -> Vec<QueuedPost> {
        self.lock().posts.clone()
    }

    /// Number of list calls made so far
    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    /// Every batch passed to `create_posts`, successful or not
    pub fn created_batches(&self) -> Vec<Vec<CreatePostRequest>> {
        self.lock().created_batches.clone()
    }

    /// Every id passed to `delete_post`, successful or not
    pub fn deleted_ids(&self) -> Vec<PostId> {
        self.lock().deleted.clone()
    }

    async fn simulate_latency(&self) {
        let delay = self.lock().delay;
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}

#[async_trait]
impl PostsApi for MockPostsApi {
    async fn list_posts(&self) -> Result<Vec<QueuedPost>> {
        self.lock().list_calls += 1;
        self.simulate_latency().await;

        let mut state = self.lock();
        match state.scripted_lists.pop_front() {
            Some(response) => response.map_err(Into::into),
            None => Ok(state.posts.clone()),
        }
    }

    async fn create_posts(&self, requests: &[CreatePostRequest]) -> Result<Vec<QueuedPost>> {
        self.lock().created_batches.push(requests.to_vec());
        self.simulate_latency().await;

        let mut state = self.lock();
        if let Some(err) = state.create_error.clone() {
            return Err(err.into());
        }

        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            state.next_id += 1;
            created.push(QueuedPost {
                id: PostId::from(state.next_id),
                content: request.content.clone(),
                platform: request.platform.as_str().to_string(),
                scheduled_at: request.scheduled_at,
                media_url: Some(request.media_url.clone()).filter(|m| !m.is_empty()),
                status: request.status,
                created_at: Some(Utc::now()),
            });
        }
        state.posts.extend(created.iter().cloned());
        state.posts.sort_by_key(|p| p.scheduled_at);
        Ok(created)
    }

    async fn delete_post(&self, id: &PostId) -> Result<()> {
        self.lock().deleted.push(id.clone());
        self.simulate_latency().await;

        let mut state = self.lock();
        if let Some(err) = state.delete_error.clone() {
            return Err(err.into());
        }

        let before = state.posts.len();
        state.posts.retain(|p| &p.id != id);
        if state.posts.len() == before {
            return Err(ApiError::Rejected {
                status: 404,
                message: "Post not found".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
