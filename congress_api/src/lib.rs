//! Low-level client for the Congress.gov v3 API: the shared hourly rate
//! budget, the HTTP transport, query builders, and typed amendment records.

mod client;
mod errors;
mod query;
pub mod rate_limiter;
pub mod types;
pub use self::client::{HttpClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use self::errors::Error;
pub use self::query::{ListQuery, Query, QueryCommon, SortDirection, MAX_LIMIT};
pub use self::rate_limiter::{RateBudget, RateLimitStatus, RateLimiter};
pub use reqwest::{header::HeaderMap, Method};
