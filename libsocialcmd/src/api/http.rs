//! `reqwest` implementation of `PostsApi`

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use super::PostsApi;
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};
use crate::types::{ApiErrorPayload, CreatePostRequest, PostId, QueuedPost};

/// HTTP client for the scheduling backend
#[derive(Debug, Clone)]
pub struct HttpPostsApi {
    client: Client,
    base_url: Url,
}

impl HttpPostsApi {
    /// Build a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(base_url.trim())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                message: format!("'{}' is not an http(s) URL", base_url),
            })?;
        debug!(url = %base_url, "Created posts API client");

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/posts`, or `{base}/posts/{id}` with the id as one encoded segment
    fn endpoint(&self, id: Option<&PostId>) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("posts");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            error!(error = ?e, "HTTP request failed");
            ApiError::Network(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, "Backend returned an error");

        let err = match serde_json::from_str::<ApiErrorPayload>(&body) {
            Ok(payload) => ApiError::Rejected {
                status: status.as_u16(),
                message: payload.detail.message(),
            },
            Err(_) => ApiError::Status {
                status: status.as_u16(),
            },
        };
        Err(err.into())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {}", e)))?;
        serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            ApiError::Decode(e.to_string()).into()
        })
    }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn list_posts(&self) -> Result<Vec<QueuedPost>> {
        let response = self.send(self.client.get(self.endpoint(None))).await?;
        let posts: Vec<QueuedPost> = Self::decode(response).await?;
        debug!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    #[instrument(skip(self, requests), fields(url = %self.base_url, count = requests.len()))]
    async fn create_posts(&self, requests: &[CreatePostRequest]) -> Result<Vec<QueuedPost>> {
        let response = self
            .send(self.client.post(self.endpoint(None)).json(requests))
            .await?;
        let created: Vec<QueuedPost> = Self::decode(response).await?;
        debug!(created = created.len(), "Created posts");
        Ok(created)
    }

    #[instrument(skip(self), fields(url = %self.base_url, post_id = %id))]
    async fn delete_post(&self, id: &PostId) -> Result<()> {
        self.send(self.client.delete(self.endpoint(Some(id)))).await?;
        debug!("Deleted post");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SocialCmdError;
    use crate::platform::PlatformId;
    use crate::types::PostStatus;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn client(url: String) -> HttpPostsApi {
        HttpPostsApi::new(&url, Duration::from_secs(5)).unwrap()
    }

    const LIST_BODY: &str = r#"[
        {"id": 1, "content": "Launch!", "platform": "twitter",
         "scheduled_at": "2025-01-01T10:00:00Z", "media_url": "",
         "status": "pending", "created_at": "2024-12-31T10:00:00Z", "updated_at": null},
        {"id": 2, "content": "Recap", "platform": "linkedin",
         "scheduled_at": "2025-01-02T10:00:00+00:00", "media_url": null,
         "status": "published", "created_at": "2024-12-31T10:00:00Z", "updated_at": null}
    ]"#;

    #[tokio::test]
    async fn list_posts_decodes_backend_records() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/posts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LIST_BODY)
            .create_async()
            .await;

        let posts = client(server.url()).list_posts().await.unwrap();
        mock.assert_async().await;

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, PostId::from(1));
        assert_eq!(posts[0].status, PostStatus::Pending);
        assert_eq!(posts[1].status, PostStatus::Published);
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/posts")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api = client(format!("{}/api/", server.url()));
        assert!(api.list_posts().await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_posts_sends_json_array() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/posts")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!([{
                "content": "Launch!",
                "platform": "twitter",
                "scheduled_at": "2025-01-01T10:00:00.000Z",
                "media_url": "",
                "status": "pending"
            }])))
            .with_status(200)
            .with_body(
                r#"[{"id": 9, "content": "Launch!", "platform": "twitter",
                     "scheduled_at": "2025-01-01T10:00:00Z", "media_url": "",
                     "status": "pending", "created_at": null}]"#,
            )
            .create_async()
            .await;

        let request = CreatePostRequest {
            content: "Launch!".to_string(),
            platform: PlatformId::Twitter,
            scheduled_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            media_url: String::new(),
            status: PostStatus::Pending,
        };
        let created = client(server.url()).create_posts(&[request]).await.unwrap();
        mock.assert_async().await;

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id, PostId::from(9));
    }

    #[tokio::test]
    async fn structured_rejection_is_surfaced() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/posts")
            .with_status(422)
            .with_body(r#"{"detail": [{"msg": "invalid datetime"}, {"msg": "field required"}]}"#)
            .create_async()
            .await;

        let err = client(server.url()).create_posts(&[]).await.unwrap_err();
        match err {
            SocialCmdError::Api(ApiError::Rejected { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "invalid datetime, field required");
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unstructured_error_maps_to_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/posts")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client(server.url()).list_posts().await.unwrap_err();
        assert!(matches!(
            err,
            SocialCmdError::Api(ApiError::Status { status: 502 })
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/posts")
            .with_status(200)
            .with_body(r#"{"posts": []}"#)
            .create_async()
            .await;

        let err = client(server.url()).list_posts().await.unwrap_err();
        assert!(matches!(err, SocialCmdError::Api(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn delete_hits_post_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/posts/42")
            .with_status(200)
            .with_body(r#"{"message": "Post deleted successfully"}"#)
            .expect(1)
            .create_async()
            .await;

        client(server.url()).delete_post(&PostId::from(42)).await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn post_id_is_one_encoded_path_segment() {
        let api = client("http://localhost:8000/api/".to_string());
        assert_eq!(api.endpoint(None).as_str(), "http://localhost:8000/api/posts");
        assert_eq!(
            api.endpoint(Some(&PostId::new("a/b?c#d"))).as_str(),
            "http://localhost:8000/api/posts/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = HttpPostsApi::new("localhost", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SocialCmdError::Config(_)));
    }

    #[tokio::test]
    async fn delete_missing_post_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/posts/404")
            .with_status(404)
            .with_body(r#"{"detail": "Post not found"}"#)
            .create_async()
            .await;

        let err = client(server.url()).delete_post(&PostId::from(404)).await.unwrap_err();
        assert_eq!(err.user_message("fallback"), "Post not found");
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let api = client(format!("http://127.0.0.1:{}", port));
        let err = api.list_posts().await.unwrap_err();
        assert!(matches!(err, SocialCmdError::Api(ApiError::Network(_))));
    }
}
