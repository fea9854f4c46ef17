//! Error types for the gateway layer.
//!
//! [`GatewayError`] is what every service and the tool registry return. At
//! the tool boundary it is flattened into an [`ErrorObject`] so the host
//! only ever sees `{kind, message, detail}`.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors produced by the gateway, wrapping transport errors and adding
/// lookup, validation, and configuration failures.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The hourly budget is spent; wait for the next window.
    #[error("Rate limit exceeded: {count} requests this hour, limit is {limit}")]
    RateLimitExceeded { count: u64, limit: u64 },
    /// Network failure or timeout.
    #[error("Transient failure talking to Congress.gov: {0}")]
    Transient(String),
    /// Upstream answered with a non-success status.
    #[error("Congress.gov API returned HTTP {status}")]
    Api { status: u16, body: String },
    /// Body was not JSON, or lacked the minimal expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// Upstream 404 for a specific resource instance.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The tool name is not registered.
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),
    /// Caller-provided arguments failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable, machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimitExceeded,
    Transient,
    ApiError,
    ParseError,
    NotFound,
    ToolNotFound,
    InvalidInput,
    ConfigError,
}

/// Structured error handed back to the tool host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: Value,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
            Self::Transient(_) => ErrorKind::Transient,
            Self::Api { .. } => ErrorKind::ApiError,
            Self::Parse(_) => ErrorKind::ParseError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ToolNotFound(_) => ErrorKind::ToolNotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::ConfigError,
        }
    }

    /// Transient failures and 5xx responses may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transient(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn to_error_object(&self) -> ErrorObject {
        let detail = match self {
            Self::RateLimitExceeded { count, limit } => json!({ "count": count, "limit": limit }),
            Self::Api { status, body } => json!({ "status": status, "body": body }),
            Self::NotFound(path) => json!({ "path": path }),
            Self::ToolNotFound(tool) => json!({ "tool": tool }),
            _ => Value::Null,
        };
        ErrorObject {
            kind: self.kind(),
            message: self.to_string(),
            detail,
        }
    }
}

impl From<congress_api::Error> for GatewayError {
    fn from(e: congress_api::Error) -> Self {
        use congress_api::Error as ApiError;
        match e {
            ApiError::RateLimitExceeded { count, limit } => Self::RateLimitExceeded { count, limit },
            ApiError::Transient(msg) => Self::Transient(msg),
            ApiError::Api { status, body } => Self::Api { status, body },
            ApiError::Parse(msg) => Self::Parse(msg),
            ApiError::InvalidUrl(msg) => Self::Config(msg),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_map_onto_gateway_kinds() {
        let cases = [
            (
                congress_api::Error::RateLimitExceeded { count: 5, limit: 5 },
                ErrorKind::RateLimitExceeded,
            ),
            (
                congress_api::Error::Transient("timed out".into()),
                ErrorKind::Transient,
            ),
            (
                congress_api::Error::Api {
                    status: 500,
                    body: String::new(),
                },
                ErrorKind::ApiError,
            ),
            (congress_api::Error::Parse("eof".into()), ErrorKind::ParseError),
            (
                congress_api::Error::InvalidUrl("not-a-url/bill".into()),
                ErrorKind::ConfigError,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(GatewayError::from(err).kind(), kind);
        }
    }

    #[test]
    fn error_object_serializes_kind_message_detail() {
        let obj = GatewayError::RateLimitExceeded {
            count: 5000,
            limit: 5000,
        }
        .to_error_object();
        let value = serde_json::to_value(&obj).unwrap();

        assert_eq!(value["kind"], "rate_limit_exceeded");
        assert_eq!(value["detail"]["count"], 5000);
        assert_eq!(value["detail"]["limit"], 5000);
        assert!(value["message"].as_str().unwrap().contains("5000"));
    }

    #[test]
    fn detail_is_null_when_there_is_nothing_to_add() {
        let obj = GatewayError::InvalidInput("limit must be a number".into()).to_error_object();
        assert_eq!(obj.kind, ErrorKind::InvalidInput);
        assert_eq!(obj.detail, Value::Null);
        assert_eq!(obj.message, "Invalid input: limit must be a number");
    }

    #[test]
    fn tool_not_found_names_the_tool() {
        let obj = GatewayError::ToolNotFound("get_widget".into()).to_error_object();
        let value = serde_json::to_value(&obj).unwrap();
        assert_eq!(value["kind"], "tool_not_found");
        assert_eq!(value["detail"]["tool"], "get_widget");
    }

    #[test]
    fn retryable_classification() {
        assert!(GatewayError::Transient("reset".into()).is_retryable());
        assert!(GatewayError::Api {
            status: 502,
            body: String::new()
        }
        .is_retryable());
        assert!(!GatewayError::Api {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(!GatewayError::RateLimitExceeded { count: 1, limit: 1 }.is_retryable());
        assert!(!GatewayError::NotFound("/bill/1".into()).is_retryable());
    }
}
