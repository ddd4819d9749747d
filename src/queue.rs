//! Client for the external priority-queue service.
//!
//! Endpoints: `GET /api/queue/all` (JSON array of strings),
//! `POST /api/queue/add` (plain-text body) and `GET /api/queue/poll`
//! (plain-text highest-priority item, removed by the call). Ordering is
//! decided by the service.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::service_base_url;

/// Errors talking to the queue service.
#[derive(Debug, Error)]
pub enum QueueError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    /// Queue service answered with a non-success status.
    #[error("queue service returned status: {0}")]
    Status(u16),
    /// Base URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Convenience result alias for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// HTTP client for the queue service.
pub struct PriorityQueueClient {
    client: reqwest::Client,
    base_url: Url,
}

impl PriorityQueueClient {
    /// Create a client for the service at `base_url`, keeping any path prefix.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> QueueResult<Self> {
        let base_url = service_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QueueError::HttpClient(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, name: &str) -> QueueResult<Url> {
        Ok(self.base_url.join(&format!("api/queue/{name}"))?)
    }

    fn check(response: reqwest::Response) -> QueueResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(QueueError::Status(response.status().as_u16()))
        }
    }

    /// Current queue contents in service order.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body is not a string array.
    pub async fn all(&self) -> QueueResult<Vec<String>> {
        let response = self.client.get(self.endpoint("all")?).send().await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Add an item. Blank items are not sent and yield `Ok(false)`.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn add(&self, item: &str) -> QueueResult<bool> {
        if item.trim().is_empty() {
            return Ok(false);
        }

        let response = self
            .client
            .post(self.endpoint("add")?)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .body(item.to_string())
            .send()
            .await?;
        Self::check(response)?;
        debug!(item, "queued item");
        Ok(true)
    }

    /// Remove and return the highest-priority item, as reported by the service.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn poll(&self) -> QueueResult<String> {
        let response = self.client.get(self.endpoint("poll")?).send().await?;
        Ok(Self::check(response)?.text().await?)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    use crate::test_support::serve;

    type Items = Arc<Mutex<Vec<String>>>;

    // Stub service: pops the lexicographically greatest item.
    fn stub(items: Items) -> Router {
        Router::new()
            .route(
                "/api/queue/all",
                get(|State(items): State<Items>| async move {
                    Json(items.lock().map(|v| v.clone()).unwrap_or_default())
                }),
            )
            .route(
                "/api/queue/add",
                post(|State(items): State<Items>, body: String| async move {
                    if let Ok(mut v) = items.lock() {
                        v.push(body);
                    }
                    StatusCode::OK
                }),
            )
            .route(
                "/api/queue/poll",
                get(|State(items): State<Items>| async move {
                    let Ok(mut v) = items.lock() else {
                        return String::new();
                    };
                    v.sort();
                    v.pop().unwrap_or_else(|| "Queue is empty".to_string())
                }),
            )
            .with_state(items)
    }

    #[tokio::test]
    async fn test_add_all_poll() {
        let base = serve(stub(Items::default())).await;
        let client = PriorityQueueClient::new(&base, Duration::from_secs(5)).expect("client builds");

        assert!(client.add("b-case").await.expect("added"));
        assert!(client.add("z-urgent").await.expect("added"));
        assert!(!client.add("   ").await.expect("blank ignored"));
        assert_eq!(client.all().await.expect("listed").len(), 2);

        assert_eq!(client.poll().await.expect("polled"), "z-urgent");
        assert_eq!(client.all().await.expect("listed"), vec!["b-case".to_string()]);
    }

    #[tokio::test]
    async fn test_base_path_prefix_is_kept() {
        let base = serve(Router::new().nest("/queue-service", stub(Items::default()))).await;
        let client = PriorityQueueClient::new(&format!("{base}/queue-service"), Duration::from_secs(5))
            .expect("client builds");
        assert!(client.add("urgent").await.expect("added"));
        assert_eq!(client.all().await.expect("listed"), vec!["urgent".to_string()]);
    }

    #[tokio::test]
    async fn test_error_status() {
        let router = Router::new().route(
            "/api/queue/all",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = serve(router).await;
        let client = PriorityQueueClient::new(&base, Duration::from_secs(5)).expect("client builds");
        assert!(matches!(client.all().await, Err(QueueError::Status(500))));
    }
}
