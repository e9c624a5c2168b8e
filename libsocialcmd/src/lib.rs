//! SocialCmd - compose and schedule posts across social platforms
//!
//! This library holds everything the SocialCmd front ends share: the static
//! platform catalog, the draft model and its validation, the client for the
//! scheduling backend, and the queue synchronisation loop that turns status
//! changes into notifications.

pub mod api;
pub mod config;
pub mod draft;
pub mod error;
pub mod logging;
pub mod platform;
pub mod service;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use api::{HttpPostsApi, PostsApi};
pub use config::Config;
pub use draft::PostDraft;
pub use error::{ApiError, SocialCmdError, Result};
pub use platform::{Platform, PlatformCatalog, PlatformId};
pub use service::SchedulerService;
pub use types::{CreatePostRequest, PostId, PostStatus, QueuedPost};
pub use validation::{ValidationResult, validate};
