//! Client side of the scheduling backend
//!
//! The backend is an external collaborator exposing three endpoints:
//!
//! - `GET /posts` - every queued post, ordered by schedule
//! - `POST /posts` - batch creation from a JSON array
//! - `DELETE /posts/{id}` - remove one post
//!
//! `PostsApi` abstracts over it so the service layer can be exercised against
//! `MockPostsApi` in tests.
//!
//! # Examples
//!
//! ```no_run
//! use libsocialcmd::api::{HttpPostsApi, PostsApi};
//! use libsocialcmd::Config;
//!
//! # async fn example() -> libsocialcmd::Result<()> {
//! let config = Config::load()?;
//! let api = HttpPostsApi::from_config(&config)?;
//!
//! for post in api.list_posts().await? {
//!     println!("{} [{}] {}", post.id, post.status, post.content);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CreatePostRequest, PostId, QueuedPost};

pub mod http;

// Mock is available for all builds (not just tests) to support integration tests
pub mod mock;

pub use http::HttpPostsApi;
pub use mock::MockPostsApi;

/// Operations offered by the scheduling backend
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Fetch the full queue
    ///
    /// # Errors
    ///
    /// `ApiError::Network` on transport failure, `ApiError::Rejected` /
    /// `ApiError::Status` on a non-success response, `ApiError::Decode` when the
    /// body is not a list of posts.
    async fn list_posts(&self) -> Result<Vec<QueuedPost>>;

    /// Create one post per request in a single call
    ///
    /// Returns the records the backend created.
    async fn create_posts(&self, requests: &[CreatePostRequest]) -> Result<Vec<QueuedPost>>;

    /// Delete a single post by id
    async fn delete_post(&self, id: &PostId) -> Result<()>;
}
