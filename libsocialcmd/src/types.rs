//! Wire types shared with the scheduling backend

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::platform::PlatformId;

/// Lifecycle of a queued post. Transitions happen server-side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Pending,
    Published,
    Failed,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Pending => f.write_str("pending"),
            PostStatus::Published => f.write_str("published"),
            PostStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Opaque server identifier.
///
/// The backend currently hands out integers; strings are accepted too so the
/// client does not care.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => PostId(n.to_string()),
            RawId::Str(s) => PostId(s),
        })
    }
}

/// Server-held post, one per platform it was scheduled for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedPost {
    pub id: PostId,
    pub content: String,
    /// Raw platform id; may name a platform this client does not know
    pub platform: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub media_url: Option<String>,
    pub status: PostStatus,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Creation payload for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub platform: PlatformId,
    #[serde(serialize_with = "serialize_millis_utc")]
    pub scheduled_at: DateTime<Utc>,
    /// Empty string when the draft carries no media
    pub media_url: String,
    pub status: PostStatus,
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_millis_utc<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

/// RFC 3339 with an offset, or a naive timestamp taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

fn deserialize_optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw))),
        None => Ok(None),
    }
}

/// Error body returned by the backend: `{"detail": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorPayload {
    pub detail: Detail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    pub msg: String,
}

impl Detail {
    /// Human-readable form: the message, the field messages joined, or the raw JSON
    pub fn message(&self) -> String {
        match self {
            Detail::Message(msg) => msg.clone(),
            Detail::Fields(fields) => fields
                .iter()
                .map(|f| f.msg.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Detail::Other(value) => value.to_string(),
        }
    }
}

/// Which slice of the queue to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueTab {
    /// Pending or failed posts
    #[default]
    Upcoming,
    /// Published posts
    History,
}

impl QueueTab {
    pub fn includes(&self, status: PostStatus) -> bool {
        match self {
            QueueTab::Upcoming => matches!(status, PostStatus::Pending | PostStatus::Failed),
            QueueTab::History => status == PostStatus::Published,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            QueueTab::Upcoming => QueueTab::History,
            QueueTab::History => QueueTab::Upcoming,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QueueTab::Upcoming => "upcoming",
            QueueTab::History => "history",
        }
    }
}

/// Posts whose content contains `query` (case-insensitive); blank matches all
pub fn search<'a>(posts: &'a [QueuedPost], query: &str) -> Vec<&'a QueuedPost> {
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|p| needle.is_empty() || p.content.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_post_status_serialization() {
        assert_eq!(serde_json::to_string(&PostStatus::Pending).unwrap(), r#""pending""#);
        let parsed: PostStatus = serde_json::from_str(r#""published""#).unwrap();
        assert_eq!(parsed, PostStatus::Published);
    }

    #[test]
    fn test_post_id_accepts_number_and_string() {
        let from_int: PostId = serde_json::from_str("42").unwrap();
        let from_str: PostId = serde_json::from_str(r#""abc-1""#).unwrap();
        assert_eq!(from_int.as_str(), "42");
        assert_eq!(from_str.as_str(), "abc-1");
    }

    #[test]
    fn test_queued_post_from_backend_json() {
        let json = r#"{
            "id": 7,
            "content": "Launch!",
            "platform": "twitter",
            "scheduled_at": "2025-01-01T10:00:00Z",
            "media_url": null,
            "status": "pending",
            "created_at": "2024-12-31T09:00:00.123456+00:00",
            "updated_at": null
        }"#;
        let post: QueuedPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, PostId::from(7));
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.scheduled_at, Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap());
        assert!(post.media_url.is_none());
        assert!(post.created_at.is_some());
    }

    #[test]
    fn test_naive_timestamp_taken_as_utc() {
        let parsed = parse_timestamp("2025-01-01T10:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap());

        let offset = parse_timestamp("2025-01-01T12:00:00+02:00").unwrap();
        assert_eq!(offset, parsed);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_create_request_wire_format() {
        let request = CreatePostRequest {
            content: "Launch!".to_string(),
            platform: PlatformId::Twitter,
            scheduled_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            media_url: String::new(),
            status: PostStatus::Pending,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "content": "Launch!",
                "platform": "twitter",
                "scheduled_at": "2025-01-01T10:00:00.000Z",
                "media_url": "",
                "status": "pending"
            })
        );
    }

    #[test]
    fn test_detail_string() {
        let payload: ApiErrorPayload =
            serde_json::from_str(r#"{"detail": "Content too long for Twitter."}"#).unwrap();
        assert_eq!(payload.detail.message(), "Content too long for Twitter.");
    }

    #[test]
    fn test_detail_field_list_joined() {
        let payload: ApiErrorPayload = serde_json::from_str(
            r#"{"detail": [
                {"loc": ["body", 0, "scheduled_at"], "msg": "invalid datetime", "type": "value_error"},
                {"loc": ["body", 0, "platform"], "msg": "field required", "type": "missing"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(payload.detail.message(), "invalid datetime, field required");
    }

    #[test]
    fn test_detail_object_rendered_as_json() {
        let payload: ApiErrorPayload =
            serde_json::from_str(r#"{"detail": {"code": "quota"}}"#).unwrap();
        assert_eq!(payload.detail.message(), r#"{"code":"quota"}"#);
    }

    fn post(id: i64, content: &str, status: PostStatus) -> QueuedPost {
        QueuedPost {
            id: PostId::from(id),
            content: content.to_string(),
            platform: "linkedin".to_string(),
            scheduled_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            media_url: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_queue_tabs() {
        assert!(QueueTab::Upcoming.includes(PostStatus::Pending));
        assert!(QueueTab::Upcoming.includes(PostStatus::Failed));
        assert!(!QueueTab::Upcoming.includes(PostStatus::Published));
        assert!(QueueTab::History.includes(PostStatus::Published));
        assert_eq!(QueueTab::Upcoming.toggle(), QueueTab::History);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let posts = vec![
            post(1, "Big Launch today", PostStatus::Pending),
            post(2, "Quarterly numbers", PostStatus::Published),
        ];
        let hits = search(&posts, "launch");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, PostId::from(1));
        assert_eq!(search(&posts, "").len(), 2);
    }
}
