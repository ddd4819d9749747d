//! Error types for lawyer directory access.

use thiserror::Error;

/// Errors that can occur while querying a lawyer directory.
///
/// None of these reach the conversation log; the lookup degrades to the
/// fallback directory instead.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Directory answered with a non-success status.
    #[error("lawyer directory returned status: {0}")]
    Status(u16),

    /// Directory base URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,
}

/// Convenience result alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
