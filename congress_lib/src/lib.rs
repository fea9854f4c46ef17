//! Gateway layer for the Congress.gov API: generic resource access, typed
//! amendments, and the tool registry an assistant host talks to.
//!
//! Wraps the `congress_api` transport crate with a static resource table,
//! input validation, structured errors, and an opt-in retry policy.

pub mod amendment;
pub mod config;
pub mod error;
pub mod resource;
pub mod retry;
pub mod tools;
pub mod validation;

pub use congress_api;
pub use congress_api::types;
pub use congress_api::{ListQuery, Query, RateLimitStatus, RateLimiter, SortDirection};

pub use amendment::AmendmentService;
pub use config::Config;
pub use error::{ErrorKind, ErrorObject, GatewayError};
pub use resource::{
    Operation, PathSegment, RawDocument, RequestSpec, ResourceDescriptor, ResourceService,
    RESOURCES,
};
pub use retry::RetryPolicy;
pub use tools::{ToolDescriptor, ToolOutput, ToolRegistry};
