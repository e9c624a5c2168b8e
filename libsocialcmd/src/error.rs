//! Error types for SocialCmd

use thiserror::Error;

use crate::validation::SubmitBlocker;

pub type Result<T> = std::result::Result<T, SocialCmdError>;

/// Message shown when the backend rejects a submission without a usable payload
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to create post";

#[derive(Error, Debug)]
pub enum SocialCmdError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation failed: {}", describe_blockers(.0))]
    Validation(Vec<SubmitBlocker>),

    #[error("A submission is already in progress")]
    SubmitInFlight,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SocialCmdError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SocialCmdError::InvalidInput(_) => 3,
            SocialCmdError::Validation(_) => 3,
            SocialCmdError::Config(_) => 2,
            SocialCmdError::Api(_) => 1,
            SocialCmdError::SubmitInFlight => 1,
        }
    }

    /// Text suitable for a transient notification.
    ///
    /// Server-side rejections surface their payload verbatim, anything else
    /// falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SocialCmdError::Api(api) => api.user_message(fallback),
            SocialCmdError::Validation(blockers) => describe_blockers(blockers),
            SocialCmdError::SubmitInFlight | SocialCmdError::InvalidInput(_) => self.to_string(),
            SocialCmdError::Config(_) => fallback.to_string(),
        }
    }
}

fn describe_blockers(blockers: &[SubmitBlocker]) -> String {
    blockers
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures talking to the scheduling backend
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Structured rejection carrying the backend's `detail` payload
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Non-success status without a decodable payload
    #[error("Unexpected status {status}")]
    Status { status: u16 },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Transient failures that the next poll may recover from
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status } => *status >= 500,
            ApiError::Rejected { status, .. } => *status >= 500,
            ApiError::Decode(_) => false,
        }
    }
}
