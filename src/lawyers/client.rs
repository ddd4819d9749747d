//! HTTP client for the remote lawyer directory.
//!
//! Contract: `GET {base}/api/lawyers?specialization=..&location=..` answering a
//! JSON array of lawyers.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use tracing::debug;
use url::Url;

use crate::config::service_base_url;
use crate::lawyers::directory::{DirectoryFuture, LawyerDirectory};
use crate::lawyers::error::{DirectoryError, DirectoryResult};
use crate::lawyers::{Lawyer, LawyerQuery};

/// Path of the search endpoint relative to the directory base URL.
const LAWYERS_PATH: &str = "api/lawyers";

/// Lawyer directory reached over HTTP.
pub struct RemoteDirectory {
    client: reqwest::Client,
    base_url: Url,
}

impl RemoteDirectory {
    /// Create a client for the directory at `base_url`. A path prefix on the
    /// base is kept.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> DirectoryResult<Self> {
        let base_url = service_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::HttpClient(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Build the search URL with query parameters.
    fn build_url(&self, query: &LawyerQuery) -> DirectoryResult<Url> {
        let mut url = self.base_url.join(LAWYERS_PATH)?;
        url.query_pairs_mut()
            .append_pair("specialization", &query.specialization)
            .append_pair("location", &query.location);
        Ok(url)
    }
}

impl LawyerDirectory for RemoteDirectory {
    fn find<'a>(&'a self, query: &'a LawyerQuery) -> DirectoryFuture<'a, DirectoryResult<Vec<Lawyer>>> {
        Box::pin(async move {
            let url = self.build_url(query)?;
            debug!(%url, "querying lawyer directory");

            let response = self
                .client
                .get(url)
                .header(ACCEPT, HeaderValue::from_static("application/json"))
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        DirectoryError::Timeout
                    } else {
                        DirectoryError::HttpRequest(e)
                    }
                })?;

            if !response.status().is_success() {
                return Err(DirectoryError::Status(response.status().as_u16()));
            }

            let lawyers: Vec<Lawyer> = response.json().await?;
            Ok(lawyers)
        })
    }
}
