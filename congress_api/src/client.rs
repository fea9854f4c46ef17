//! HTTP client for the Congress.gov v3 API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::{rate_limiter::RateLimiter, Error};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.congress.gov/v3";

/// Request timeout for Congress.gov API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Congress.gov API.
///
/// Every request first reserves a slot on the shared [`RateLimiter`]; when
/// the budget is spent the call fails without touching the network. The
/// API key travels as the `api_key` query parameter and `format=json` is
/// always requested. There are no automatic retries.
pub struct HttpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl HttpClient {
    /// Creates a client pointing at the production API.
    pub fn new(api_key: String, limiter: Arc<RateLimiter>) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, limiter)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(
        base_url: &str,
        api_key: String,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, Error> {
        Self::with_options(base_url, api_key, limiter, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom base URL and request timeout.
    pub fn with_options(
        base_url: &str,
        api_key: String,
        limiter: Arc<RateLimiter>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transient(e.to_string())
            })?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
        })
    }

    /// The rate limiter shared by this client.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The API root requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, Error> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(format!("{}: {}", joined, e))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("format", "json");
        }
        Ok(url)
    }

    /// Sends one request and returns the decoded JSON body.
    ///
    /// `path` is relative to the base URL (e.g. `bill/118/hr/2670`). Fails with
    /// [`Error::InvalidUrl`] without spending budget when the base URL and
    /// path do not form a URL, [`Error::RateLimitExceeded`] before any I/O
    /// when the budget is spent,
    /// [`Error::Transient`] on network errors and timeouts, [`Error::Api`] on
    /// non-success statuses, and [`Error::Parse`] when the body is not JSON.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        headers: HeaderMap,
    ) -> Result<Value, Error> {
        let url = self.get_url(path, query)?;
        self.limiter.check_and_reserve()?;

        tracing::debug!("{} /{}", method, path.trim_start_matches('/'));

        let resp = self
            .client
            .request(method, url)
            .header("accept", "application/json")
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                let msg = redact(e);
                tracing::error!("Failed to get resource {}: {}", path, msg);
                Error::Transient(msg)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            let msg = redact(e);
            tracing::error!("Failed to read response body: {}", msg);
            Error::Transient(msg)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request for {} failed with status {}: {}", path, status, snippet);
            return Err(Error::Api {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<Value>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Parse(e.to_string())
        })
    }

    /// `GET` with no extra headers.
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, Error> {
        self.execute(Method::GET, path, query, HeaderMap::new()).await
    }
}

/// reqwest errors embed the full URL, which carries the API key.
fn redact(err: reqwest::Error) -> String {
    err.without_url().to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
