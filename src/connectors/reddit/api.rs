use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::config::{BASE_URL, USER_AGENT};

/// One element of a Reddit listing.
#[derive(Debug, Deserialize)]
pub struct ListingChild {
    pub kind: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    pub children: Vec<ListingChild>,
}

/// Reddit listing envelope (`{"kind": "Listing", "data": {...}}`).
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

/// HTTP client for the Reddit OAuth API.
///
/// Authenticates with a Bearer token. Reddit rejects requests without
/// a unique User-Agent, so one is set on every request.
pub struct RedditClient {
    access_token: String,
    http_client: Client,
    base_url: String,
}

impl RedditClient {
    /// Create a client using the default Reddit OAuth API base URL.
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (for testing with a mock server).
    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            access_token,
            http_client,
            base_url,
        }
    }

    /// Fetch a listing for one data set (`new` for posts, `comments`
    /// for comments) and return its children.
    pub async fn fetch_listing(&self, path: &str) -> Result<Vec<ListingChild>> {
        let url = format!("{}/{}?limit=25", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to send listing request")?;

        check_response_status(&response)?;
        let listing = response
            .json::<Listing>()
            .await
            .context("Failed to parse listing response")?;
        Ok(listing.data.children)
    }
}

/// Map known Reddit error codes to descriptive errors.
///
/// - 401 → auth error (token expired or invalid)
/// - 403/429 → rate limit or blocked (logs X-Ratelimit-Remaining)
/// - Other non-2xx → generic API error
fn check_response_status(response: &reqwest::Response) -> Result<()> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(anyhow!("Reddit auth error: token expired or invalid")),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            let remaining = response
                .headers()
                .get("X-Ratelimit-Remaining")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("0");
            Err(anyhow!(
                "Reddit rate limit exceeded (X-Ratelimit-Remaining: {})",
                remaining
            ))
        }
        s if !s.is_success() => Err(anyhow!("Reddit API error: {}", s)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_listing() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/new?limit=25")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "kind": "Listing",
                    "data": {
                        "children": [
                            {"kind": "t3", "data": {"id": "abc", "title": "First post"}},
                            {"kind": "t3", "data": {"id": "def", "title": "Second post"}}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = RedditClient::with_base_url("test_token".to_string(), server.url());
        let children = client.fetch_listing("new").await.unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].kind, "t3");
        assert_eq!(children[0].data["title"], "First post");
    }

    #[tokio::test]
    async fn test_401_auth_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/new?limit=25")
            .with_status(401)
            .with_body(r#"{"message": "Unauthorized"}"#)
            .create_async()
            .await;

        let client = RedditClient::with_base_url("expired_token".to_string(), server.url());
        let err = client.fetch_listing("new").await.unwrap_err();
        assert!(err.to_string().contains("token expired or invalid"));
    }

    #[tokio::test]
    async fn test_429_rate_limit() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/comments?limit=25")
            .with_status(429)
            .with_header("X-Ratelimit-Remaining", "0")
            .with_body(r#"{"message": "Too Many Requests"}"#)
            .create_async()
            .await;

        let client = RedditClient::with_base_url("test_token".to_string(), server.url());
        let err = client.fetch_listing("comments").await.unwrap_err();
        assert!(err.to_string().contains("rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/new?limit=25")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let client = RedditClient::with_base_url("test_token".to_string(), server.url());
        let err = client.fetch_listing("new").await.unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
