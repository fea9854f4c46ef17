//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The hourly request budget is spent. No request was sent.
    #[error("Rate limit exceeded: {count} requests in the current hour, limit is {limit}")]
    RateLimitExceeded { count: u64, limit: u64 },
    /// The request never produced a response (connect failure, timeout, broken body).
    #[error("Request failed: {0}")]
    Transient(String),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    Api { status: u16, body: String },
    /// The response body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// The base URL and path could not be combined into a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// HTTP status carried by an [`Error::Api`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry the same request later.
    ///
    /// Rate limit exhaustion is not retryable; the budget only recovers
    /// when the hourly window rolls over.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transient(_) => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
