//! Generic access to every Congress.gov collection.
//!
//! Each top-level route is described once in [`RESOURCES`]. Any of them can be
//! listed, fetched by path segments, or drilled into through a subresource
//! with the same three calls on [`ResourceService`]; responses stay untyped
//! [`RawDocument`]s.

use std::fmt;
use std::sync::Arc;

use congress_api::{HttpClient, ListQuery, Query};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;
use crate::validation;

/// Static description of one top-level API route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Route name as the API spells it, e.g. `committee-report`.
    pub name: &'static str,
    /// Path under the API root.
    pub base_path: &'static str,
    /// Tool-name prefix, e.g. `committee_report`.
    pub tool_prefix: &'static str,
    pub description: &'static str,
    /// How path segments are laid out for this route.
    pub path_hint: &'static str,
    pub sample_path: &'static str,
}

impl ResourceDescriptor {
    /// Looks a descriptor up by route name.
    pub fn find(name: &str) -> Option<&'static ResourceDescriptor> {
        RESOURCES.iter().find(|r| r.name == name)
    }

    /// Like [`find`](Self::find), but an unknown name is an input error.
    pub fn lookup(name: &str) -> Result<&'static ResourceDescriptor, GatewayError> {
        Self::find(name)
            .ok_or_else(|| GatewayError::InvalidInput(format!("unknown resource '{}'", name)))
    }

    /// Description shown to the assistant alongside the route and segment hint.
    pub fn tool_description(&self) -> String {
        format!(
            "{} This tool works with the `/v3/{}` endpoint. {}",
            self.description, self.base_path, self.path_hint
        )
    }
}

macro_rules! resource {
    ($name:literal, $prefix:literal, $desc:literal, $hint:literal, $sample:literal) => {
        ResourceDescriptor {
            name: $name,
            base_path: $name,
            tool_prefix: $prefix,
            description: $desc,
            path_hint: $hint,
            sample_path: $sample,
        }
    };
}

/// The one route whose records are deserialized into typed amendments.
pub const AMENDMENT: ResourceDescriptor = resource!(
    "amendment",
    "amendment",
    "List and inspect House and Senate amendments with typed records.",
    "Provide path segments as [congress, amendment_type, amendment_number], such as [117, 'samdt', 2137].",
    "amendment/117/samdt/2137"
);

/// Every route the gateway knows about, in tool listing order.
pub static RESOURCES: &[ResourceDescriptor] = &[
    resource!(
        "bill",
        "bill",
        "Work with bills and joint resolutions, including metadata and related content.",
        "Provide path segments as [congress, bill_type, bill_number], such as [118, 'hr', 2670].",
        "bill/118/hr/2670"
    ),
    AMENDMENT,
    resource!(
        "summaries",
        "summaries",
        "Access CRS-authored bill summaries from the `/v3/summaries` collection.",
        "Provide [congress, bill_type, bill_number] to target summaries for a specific bill.",
        "summaries/118/hr/2670"
    ),
    resource!(
        "congress",
        "congress",
        "Retrieve data about individual congresses and related session metadata.",
        "Use segments such as [118] to target a single congress or ['current'] for the latest.",
        "congress/118"
    ),
    resource!(
        "committee",
        "committee",
        "Query congressional committee information including history and membership.",
        "Segments often follow [chamber, committee_code] or [congress, chamber, committee_code], e.g., ['house', 'hsap00'].",
        "committee/house/hsap00"
    ),
    resource!(
        "committee-report",
        "committee_report",
        "Retrieve committee reports and related metadata or text attachments.",
        "Segments typically follow [congress, report_type, report_number], such as [118, 'hrpt', 5].",
        "committee-report/118/hrpt/5"
    ),
    resource!(
        "committee-print",
        "committee_print",
        "Access committee prints and supporting documents produced for hearings.",
        "Use [congress, chamber, jacket_number], for example [118, 'house', 'CPRT-118HPRT00361'].",
        "committee-print/118/house/CPRT-118HPRT00361"
    ),
    resource!(
        "committee-meeting",
        "committee_meeting",
        "Access hearings and meetings scheduled by committees.",
        "Provide [congress, chamber, event_id] to retrieve a specific meeting when available.",
        "committee-meeting/118/house/115538"
    ),
    resource!(
        "hearing",
        "hearing",
        "Retrieve committee hearing transcripts, metadata, and witness information.",
        "Segments commonly include [congress, chamber, jacket_number].",
        "hearing/118/house/HHRG-118-II24-20230324-SD001"
    ),
    resource!(
        "member",
        "member",
        "Access information about members of Congress, including biographical data and sponsored items.",
        "Use a bioguide ID such as ['A000360'] or segments like ['congress', 118, 'state', 'CA'] for rosters.",
        "member/A000360"
    ),
    resource!(
        "nomination",
        "nomination",
        "Query presidential nominations and their status, actions, and hearing history.",
        "Segments usually follow [congress, nomination_number], such as [118, 'PN56'].",
        "nomination/118/PN56"
    ),
    resource!(
        "treaty",
        "treaty",
        "Retrieve treaties submitted to the Senate and related actions or texts.",
        "Use [congress, treaty_number] for treaty details, for example [118, 1].",
        "treaty/118/1"
    ),
    resource!(
        "crsreport",
        "crs_report",
        "Fetch Congressional Research Service reports and associated metadata.",
        "Provide [report_number] such as ['R47355'] to access a specific CRS report.",
        "crsreport/R47355"
    ),
    resource!(
        "law",
        "law",
        "Retrieve public and private laws, including text and related actions.",
        "Segments typically follow [congress, law_type, law_number], such as [117, 'publaw', 58].",
        "law/117/publaw/58"
    ),
    resource!(
        "house-communication",
        "house_communication",
        "Work with executive and agency communications received by the House.",
        "Segments commonly include [congress, communication_type, communication_number], e.g., [118, 'EC', 1].",
        "house-communication/118/EC/1"
    ),
    resource!(
        "senate-communication",
        "senate_communication",
        "Access executive and presidential communications received by the Senate.",
        "Segments commonly include [congress, communication_type, communication_number], e.g., [118, 'PN', 1].",
        "senate-communication/118/PN/1"
    ),
    resource!(
        "house-requirement",
        "house_requirement",
        "Inspect House communication requirements and their matching submissions.",
        "Provide [requirement_number] such as [1201] to review a specific requirement.",
        "house-requirement/1201"
    ),
    resource!(
        "house-vote",
        "house_vote",
        "Retrieve roll call votes published as part of the House vote endpoint.",
        "Segments follow [congress, session, vote_number], for example [118, 1, 5].",
        "house-vote/118/1/5"
    ),
    resource!(
        "congressional-record",
        "congressional_record",
        "Work with the daily Congressional Record collection and its articles.",
        "This endpoint relies on query parameters such as fromDateTime and issue identifiers.",
        "congressional-record"
    ),
    resource!(
        "daily-congressional-record",
        "daily_congressional_record",
        "Browse the digitized daily Congressional Record by volume and issue number.",
        "Provide [volume_number, issue_number] like [169, '100'] for a particular issue.",
        "daily-congressional-record/169/100"
    ),
    resource!(
        "bound-congressional-record",
        "bound_congressional_record",
        "Access bound Congressional Record volumes organized by year, month, and day.",
        "Use [year, month, day] values such as [1990, 5, 1] to reach a bound issue.",
        "bound-congressional-record/1990/5/1"
    ),
];

/// One path component: tool callers send a mix of numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Number(i64),
    Text(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Number(n) => write!(f, "{}", n),
            PathSegment::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PathSegment {
    fn from(n: i64) -> Self {
        PathSegment::Number(n)
    }
}

impl From<i32> for PathSegment {
    fn from(n: i32) -> Self {
        PathSegment::Number(n as i64)
    }
}

impl From<u32> for PathSegment {
    fn from(n: u32) -> Self {
        PathSegment::Number(n as i64)
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        PathSegment::Text(s.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(s: String) -> Self {
        PathSegment::Text(s)
    }
}

/// Builds a `Vec<PathSegment>` from mixed literals: `segments![118, "hr", 2670]`.
#[macro_export]
macro_rules! segments {
    ($($seg:expr),* $(,)?) => {
        vec![$($crate::resource::PathSegment::from($seg)),*]
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    GetSubresource,
}

/// Everything needed to issue one call against a resource.
#[derive(Debug, Clone)]
pub struct RequestSpec<'a> {
    pub resource: &'a ResourceDescriptor,
    pub path_segments: Vec<PathSegment>,
    pub query: ListQuery,
    pub operation: Operation,
    pub subresource: Option<String>,
}

impl<'a> RequestSpec<'a> {
    pub fn list(resource: &'a ResourceDescriptor, query: ListQuery) -> Self {
        Self {
            resource,
            path_segments: Vec::new(),
            query,
            operation: Operation::List,
            subresource: None,
        }
    }

    pub fn get(resource: &'a ResourceDescriptor, path_segments: Vec<PathSegment>) -> Self {
        Self {
            resource,
            path_segments,
            query: ListQuery::default(),
            operation: Operation::Get,
            subresource: None,
        }
    }

    pub fn subresource(
        resource: &'a ResourceDescriptor,
        path_segments: Vec<PathSegment>,
        subresource: &str,
        query: ListQuery,
    ) -> Self {
        Self {
            resource,
            path_segments,
            query,
            operation: Operation::GetSubresource,
            subresource: Some(subresource.to_string()),
        }
    }

    /// Leading segments that narrow a list, e.g. `[118]` for one congress.
    pub fn with_scope(mut self, scope: Vec<PathSegment>) -> Self {
        self.path_segments = scope;
        self
    }

    /// Relative request path: `{base_path}[/{segments}][/{subresource}]`.
    ///
    /// Blank segments are skipped and surrounding slashes stripped. Segments
    /// that would alter the URL structure (`..`, `?`, `#`) are rejected.
    pub fn path(&self) -> Result<String, GatewayError> {
        let mut parts = vec![self.resource.base_path.to_string()];
        for segment in &self.path_segments {
            let rendered = segment.to_string();
            if rendered.trim().trim_matches('/').trim().is_empty() {
                continue;
            }
            parts.push(validation::validate_segment(&rendered)?);
        }

        match self.operation {
            Operation::List => {}
            Operation::Get => {
                if parts.len() == 1 {
                    return Err(GatewayError::InvalidInput(format!(
                        "path_segments are required to get a {}",
                        self.resource.name
                    )));
                }
            }
            Operation::GetSubresource => {
                let sub = self.subresource.as_deref().unwrap_or_default();
                parts.extend(validation::validate_subresource(sub)?);
            }
        }
        Ok(parts.join("/"))
    }
}

/// Untyped JSON body returned for every resource without a typed schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument(pub Value);

impl RawDocument {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Issues list, get, and subresource calls for any [`ResourceDescriptor`].
#[derive(Clone)]
pub struct ResourceService {
    client: Arc<HttpClient>,
}

impl ResourceService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    /// Single code path behind all three operations.
    ///
    /// A 404 while addressing a specific instance becomes
    /// [`GatewayError::NotFound`]; a 404 on a collection stays an API error.
    pub async fn execute(&self, spec: &RequestSpec<'_>) -> Result<RawDocument, GatewayError> {
        let path = spec.path()?;
        let query = spec.query.to_query_pairs();
        match self.client.get(&path, &query).await {
            Ok(value) => Ok(RawDocument(value)),
            Err(congress_api::Error::Api { status: 404, .. })
                if spec.operation != Operation::List =>
            {
                Err(GatewayError::NotFound(path))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lists a collection. `limit` is sent as given; clamp it to 250 first.
    pub async fn list(
        &self,
        resource: &ResourceDescriptor,
        query: ListQuery,
    ) -> Result<RawDocument, GatewayError> {
        self.execute(&RequestSpec::list(resource, query)).await
    }

    /// Lists a collection narrowed by leading segments (`bill/118/hr`).
    pub async fn list_in(
        &self,
        resource: &ResourceDescriptor,
        scope: Vec<PathSegment>,
        query: ListQuery,
    ) -> Result<RawDocument, GatewayError> {
        self.execute(&RequestSpec::list(resource, query).with_scope(scope))
            .await
    }

    pub async fn get(
        &self,
        resource: &ResourceDescriptor,
        path_segments: Vec<PathSegment>,
    ) -> Result<RawDocument, GatewayError> {
        self.execute(&RequestSpec::get(resource, path_segments)).await
    }

    /// Fetches a nested route such as `text` or `actions`. A blank
    /// subresource fails before any request is sent.
    pub async fn get_subresource(
        &self,
        resource: &ResourceDescriptor,
        path_segments: Vec<PathSegment>,
        subresource: &str,
        query: ListQuery,
    ) -> Result<RawDocument, GatewayError> {
        self.execute(&RequestSpec::subresource(
            resource,
            path_segments,
            subresource,
            query,
        ))
        .await
    }
}
