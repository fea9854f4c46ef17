//! Tool catalogue and dispatch.
//!
//! Every configured [`ResourceDescriptor`] yields three tools
//! (`list_{prefix}`, `get_{prefix}`, `get_{prefix}_subresource`); the
//! amendment resource adds three search helpers. Descriptors and routes
//! are generated together, so a listed tool always dispatches and an
//! unlisted one never does.

use std::collections::BTreeMap;
use std::sync::Arc;

use congress_api::types::{AmendmentResponse, AmendmentsResponse};
use congress_api::{HttpClient, ListQuery, Query, RateLimitStatus, RateLimiter, SortDirection};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::amendment::{AmendmentService, MAX_SEARCH_RESULTS};
use crate::config::Config;
use crate::error::GatewayError;
use crate::resource::{PathSegment, RawDocument, ResourceDescriptor, ResourceService, RESOURCES};
use crate::retry::{with_retry, RetryPolicy};
use crate::validation;

pub const SEARCH_AMENDMENTS: &str = "search_amendments";
pub const AMENDMENTS_BY_SPONSOR: &str = "get_amendments_by_sponsor";
pub const RECENT_AMENDMENTS: &str = "get_recent_amendments";

const DEFAULT_DAYS_BACK: i64 = 30;

/// What the host sees when it enumerates tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Result of a tool invocation. Typed amendment data and raw documents are
/// kept apart so unvalidated JSON is never mistaken for a checked record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ToolOutput {
    Amendments(AmendmentsResponse),
    Amendment(AmendmentResponse),
    Raw(RawDocument),
}

#[derive(Debug, Clone, Copy)]
enum Route {
    List(&'static ResourceDescriptor),
    Get(&'static ResourceDescriptor),
    Subresource(&'static ResourceDescriptor),
    SearchAmendments,
    AmendmentsBySponsor,
    RecentAmendments,
}

/// Dispatches tool calls to the resource and amendment services.
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    routes: BTreeMap<String, Route>,
    resources: ResourceService,
    amendments: AmendmentService,
    retry: RetryPolicy,
}

impl ToolRegistry {
    /// Registry over every known resource.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_resources(client, RESOURCES.iter())
    }

    /// Registry over a subset of resources; tools for the rest do not exist.
    pub fn with_resources<I>(client: Arc<HttpClient>, descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'static ResourceDescriptor>,
    {
        let resources = ResourceService::new(client);
        let amendments = AmendmentService::new(resources.clone());
        let mut tools = Vec::new();
        let mut routes = BTreeMap::new();
        for descriptor in descriptors {
            for (tool, route) in tools_for(descriptor) {
                if routes.insert(tool.name.clone(), route).is_none() {
                    tools.push(tool);
                }
            }
        }
        Self {
            tools,
            routes,
            resources,
            amendments,
            retry: RetryPolicy::none(),
        }
    }

    /// Builds the client stack (shared limiter, HTTP client) from configuration.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let limiter = Arc::new(RateLimiter::new(config.rate_limit_per_hour));
        let client = HttpClient::with_options(
            &config.base_url,
            config.api_key.clone(),
            limiter,
            config.request_timeout,
        )?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn describe_tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.resources.client().limiter().status()
    }

    /// Validates arguments and runs the named tool.
    ///
    /// Unknown tools fail with [`GatewayError::ToolNotFound`] before any
    /// request is made.
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<ToolOutput, GatewayError> {
        let route = *self
            .routes
            .get(name)
            .ok_or_else(|| GatewayError::ToolNotFound(name.to_string()))?;
        let arguments = normalize_arguments(arguments)?;
        tracing::debug!("Invoking tool {}", name);
        with_retry(&self.retry, name, || self.dispatch(route, &arguments)).await
    }

    /// Host boundary: always returns JSON, either the serialized
    /// [`ToolOutput`] or `{"error": {kind, message, detail}}`.
    pub async fn call(&self, name: &str, arguments: Value) -> Value {
        let result = self
            .invoke(name, arguments)
            .await
            .and_then(|output| serde_json::to_value(output).map_err(GatewayError::from));
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Tool {} failed: {}", name, e);
                json!({ "error": e.to_error_object() })
            }
        }
    }

    async fn dispatch(&self, route: Route, arguments: &Value) -> Result<ToolOutput, GatewayError> {
        match route {
            Route::List(descriptor) => {
                let args: ListArgs = parse_args(arguments)?;
                let query = args.page.to_query()?;
                let congress = args.congress.map(validation::validate_congress).transpose()?;
                if descriptor.name == crate::resource::AMENDMENT.name {
                    if args.path_segments.is_some() {
                        return Err(GatewayError::InvalidInput(
                            "list_amendment takes congress and amendment_type, not path_segments"
                                .to_string(),
                        ));
                    }
                    let amendment_type = args
                        .amendment_type
                        .as_deref()
                        .map(validation::validate_amendment_type)
                        .transpose()?;
                    let page = self.amendments.list(congress, amendment_type, query).await?;
                    return Ok(ToolOutput::Amendments(page));
                }
                if args.amendment_type.is_some() {
                    return Err(GatewayError::InvalidInput(format!(
                        "amendment_type does not apply to {}",
                        descriptor.name
                    )));
                }
                let mut scope: Vec<PathSegment> = congress.map(PathSegment::from).into_iter().collect();
                scope.extend(args.path_segments.unwrap_or_default());
                let doc = self.resources.list_in(descriptor, scope, query).await?;
                Ok(ToolOutput::Raw(doc))
            }
            Route::Get(descriptor) => {
                let args: GetArgs = parse_args(arguments)?;
                if descriptor.name == crate::resource::AMENDMENT.name {
                    let (congress, amendment_type, number) = amendment_id(&args.path_segments)?;
                    let detail = self.amendments.get(congress, amendment_type, number).await?;
                    return Ok(ToolOutput::Amendment(detail));
                }
                let doc = self.resources.get(descriptor, args.path_segments).await?;
                Ok(ToolOutput::Raw(doc))
            }
            Route::Subresource(descriptor) => {
                let args: SubresourceArgs = parse_args(arguments)?;
                let query = args.page.to_query()?;
                let doc = self
                    .resources
                    .get_subresource(descriptor, args.path_segments, &args.subresource, query)
                    .await?;
                Ok(ToolOutput::Raw(doc))
            }
            Route::SearchAmendments => {
                let args: SearchArgs = parse_args(arguments)?;
                let text = validation::validate_search(&args.query)?;
                let congress = args.congress.map(validation::validate_congress).transpose()?;
                let limit = args.limit.map(|l| validation::clamp_limit(l) as usize);
                let page = self.amendments.search_by_text(&text, congress, limit).await?;
                Ok(ToolOutput::Amendments(page))
            }
            Route::AmendmentsBySponsor => {
                let args: SponsorArgs = parse_args(arguments)?;
                let bioguide_id = validation::validate_bioguide_id(&args.bioguide_id)?;
                let congress = args.congress.map(validation::validate_congress).transpose()?;
                let limit = args.limit.map(|l| validation::clamp_limit(l) as usize);
                let page = self.amendments.by_sponsor(&bioguide_id, congress, limit).await?;
                Ok(ToolOutput::Amendments(page))
            }
            Route::RecentAmendments => {
                let args: RecentArgs = parse_args(arguments)?;
                let days_back =
                    validation::validate_days_back(args.days_back.unwrap_or(DEFAULT_DAYS_BACK))?;
                let congress = args.congress.map(validation::validate_congress).transpose()?;
                let limit = args.limit.map(|l| validation::clamp_limit(l) as usize);
                let page = self.amendments.recent(congress, days_back, limit).await?;
                Ok(ToolOutput::Amendments(page))
            }
        }
    }
}

/// Descriptors for every known resource, without building a client.
pub fn catalogue() -> Vec<ToolDescriptor> {
    RESOURCES
        .iter()
        .flat_map(tools_for)
        .map(|(tool, _)| tool)
        .collect()
}

// -- Arguments --

#[derive(Debug, Default, Deserialize)]
struct PageArgs {
    limit: Option<i64>,
    offset: Option<i64>,
    from_date_time: Option<String>,
    to_date_time: Option<String>,
    sort: Option<String>,
    cursor: Option<String>,
    filters: Option<BTreeMap<String, String>>,
}

impl PageArgs {
    fn to_query(&self) -> Result<ListQuery, GatewayError> {
        let mut query = ListQuery::default();
        if let Some(limit) = self.limit {
            query = query.with_limit(validation::clamp_limit(limit));
        }
        if let Some(offset) = self.offset {
            query = query.with_offset(validation::validate_offset(offset)?);
        }
        if let Some(from) = &self.from_date_time {
            query = query.with_from_date_time(&validation::sanitize_text(from, 32)?);
        }
        if let Some(to) = &self.to_date_time {
            query = query.with_to_date_time(&validation::sanitize_text(to, 32)?);
        }
        if let Some(sort) = &self.sort {
            let direction: SortDirection = sort.parse().map_err(|_| {
                GatewayError::InvalidInput(format!("sort must be 'asc' or 'desc', got '{}'", sort))
            })?;
            query = query.with_sort_direction(direction);
        }
        if let Some(cursor) = &self.cursor {
            query = query.with_cursor(&validation::sanitize_text(cursor, 512)?);
        }
        for (key, value) in self.filters.iter().flatten() {
            query = query.with_param(
                &validation::validate_filter_key(key)?,
                validation::sanitize_text(value, validation::MAX_FILTER_VALUE_LENGTH)?,
            );
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    congress: Option<i64>,
    amendment_type: Option<String>,
    path_segments: Option<Vec<PathSegment>>,
    #[serde(flatten)]
    page: PageArgs,
}

#[derive(Debug, Deserialize)]
struct GetArgs {
    path_segments: Vec<PathSegment>,
}

#[derive(Debug, Deserialize)]
struct SubresourceArgs {
    path_segments: Vec<PathSegment>,
    subresource: String,
    #[serde(flatten)]
    page: PageArgs,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    congress: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SponsorArgs {
    bioguide_id: String,
    congress: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RecentArgs {
    congress: Option<i64>,
    days_back: Option<i64>,
    limit: Option<i64>,
}

fn normalize_arguments(arguments: Value) -> Result<Value, GatewayError> {
    match arguments {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) => Ok(arguments),
        other => Err(GatewayError::InvalidInput(format!(
            "arguments must be a JSON object, got {}",
            other
        ))),
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: &Value) -> Result<T, GatewayError> {
    T::deserialize(arguments).map_err(|e| GatewayError::InvalidInput(e.to_string()))
}

/// `[congress, type, number]` from the path segments of `get_amendment`.
fn amendment_id(
    segments: &[PathSegment],
) -> Result<(u32, congress_api::types::AmendmentType, u32), GatewayError> {
    let usage = || {
        GatewayError::InvalidInput(
            "get_amendment expects path_segments [congress, amendment_type, amendment_number]"
                .to_string(),
        )
    };
    let [congress, kind, number] = segments else {
        return Err(usage());
    };
    let as_int = |seg: &PathSegment| match seg {
        PathSegment::Number(n) => Ok(*n),
        PathSegment::Text(s) => s.trim().parse::<i64>().map_err(|_| usage()),
    };
    let congress = validation::validate_congress(as_int(congress)?)?;
    let amendment_type = validation::validate_amendment_type(&kind.to_string())?;
    let number = validation::validate_number(as_int(number)?)?;
    Ok((congress, amendment_type, number))
}

// -- Descriptors --

fn tools_for(descriptor: &'static ResourceDescriptor) -> Vec<(ToolDescriptor, Route)> {
    let prefix = descriptor.tool_prefix;
    let is_amendment = descriptor.name == crate::resource::AMENDMENT.name;
    let mut tools = vec![
        (
            ToolDescriptor {
                name: format!("list_{}", prefix),
                description: format!(
                    "List {} records. {}",
                    descriptor.name,
                    descriptor.tool_description()
                ),
                input_schema: if is_amendment {
                    amendment_list_schema()
                } else {
                    list_schema()
                },
            },
            Route::List(descriptor),
        ),
        (
            ToolDescriptor {
                name: format!("get_{}", prefix),
                description: format!(
                    "Get a single {} record. {}",
                    descriptor.name,
                    descriptor.tool_description()
                ),
                input_schema: get_schema(descriptor),
            },
            Route::Get(descriptor),
        ),
        (
            ToolDescriptor {
                name: format!("get_{}_subresource", prefix),
                description: format!(
                    "Get a nested resource (e.g. text, actions) of a {} record. {}",
                    descriptor.name,
                    descriptor.tool_description()
                ),
                input_schema: subresource_schema(descriptor),
            },
            Route::Subresource(descriptor),
        ),
    ];
    if is_amendment {
        tools.extend(amendment_helper_tools());
    }
    tools
}

fn amendment_helper_tools() -> Vec<(ToolDescriptor, Route)> {
    vec![
        (
            ToolDescriptor {
                name: SEARCH_AMENDMENTS.to_string(),
                description: format!(
                    "Search amendments by text in their description or purpose. Scans one page of \
                     up to 250 amendments and returns at most {} matches.",
                    MAX_SEARCH_RESULTS
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "minLength": 1,
                            "maxLength": validation::MAX_SEARCH_LENGTH,
                            "description": "Text to look for (case-insensitive)"
                        },
                        "congress": congress_property(),
                        "limit": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": MAX_SEARCH_RESULTS,
                            "description": "Maximum number of matches to return"
                        }
                    },
                    "required": ["query"]
                }),
            },
            Route::SearchAmendments,
        ),
        (
            ToolDescriptor {
                name: AMENDMENTS_BY_SPONSOR.to_string(),
                description: "Get amendments sponsored by a specific member.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "bioguide_id": {
                            "type": "string",
                            "pattern": "^[A-Za-z][0-9]{6}$",
                            "description": "Bioguide ID of the sponsor (e.g., S001191)"
                        },
                        "congress": congress_property(),
                        "limit": limit_property()
                    },
                    "required": ["bioguide_id"]
                }),
            },
            Route::AmendmentsBySponsor,
        ),
        (
            ToolDescriptor {
                name: RECENT_AMENDMENTS.to_string(),
                description: "Get amendments with a latest action in the last N days.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "congress": congress_property(),
                        "days_back": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": validation::MAX_DAYS_BACK,
                            "default": DEFAULT_DAYS_BACK,
                            "description": "Number of days to look back"
                        },
                        "limit": limit_property()
                    },
                    "required": []
                }),
            },
            Route::RecentAmendments,
        ),
    ]
}

fn congress_property() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": validation::MAX_CONGRESS,
        "description": "Congress number (e.g., 118)"
    })
}

fn limit_property() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": congress_api::MAX_LIMIT,
        "default": 20,
        "description": "Maximum number of results (1-250)"
    })
}

fn path_segments_property(example: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": ["string", "integer"] },
        "description": format!("Path segments after the resource name, e.g. {}", example)
    })
}

fn page_properties() -> Map<String, Value> {
    let props = json!({
        "limit": limit_property(),
        "offset": {
            "type": "integer",
            "minimum": 0,
            "default": 0,
            "description": "Number of results to skip"
        },
        "from_date_time": {
            "type": "string",
            "description": "Only records updated at or after this time (YYYY-MM-DDT00:00:00Z)"
        },
        "to_date_time": {
            "type": "string",
            "description": "Only records updated at or before this time (YYYY-MM-DDT00:00:00Z)"
        },
        "sort": {
            "type": "string",
            "enum": ["asc", "desc"],
            "description": "Sort by update date"
        },
        "cursor": {
            "type": "string",
            "description": "Pagination cursor from a previous response"
        },
        "filters": {
            "type": "object",
            "additionalProperties": {"type": "string"},
            "description": "Extra query parameters passed to the API unchanged, e.g. {\"chamber\": \"house\"}"
        }
    });
    match props {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn object_schema(properties: Map<String, Value>, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn list_schema() -> Value {
    let mut props = page_properties();
    props.insert("congress".to_string(), congress_property());
    props.insert(
        "path_segments".to_string(),
        path_segments_property("['hr'] to narrow bills to House bills"),
    );
    object_schema(props, &[])
}

fn amendment_list_schema() -> Value {
    let mut props = page_properties();
    props.insert("congress".to_string(), congress_property());
    props.insert(
        "amendment_type".to_string(),
        json!({
            "type": "string",
            "enum": ["HAMDT", "SAMDT", "SUAMDT", "hamdt", "samdt", "suamdt"],
            "description": "Amendment type: HAMDT (House), SAMDT (Senate), SUAMDT (Senate unprinted). Requires congress."
        }),
    );
    object_schema(props, &[])
}

fn sample_segments(descriptor: &ResourceDescriptor) -> String {
    let rest = descriptor
        .sample_path
        .strip_prefix(descriptor.base_path)
        .unwrap_or_default()
        .trim_matches('/');
    let parts: Vec<String> = rest
        .split('/')
        .filter(|p| !p.is_empty())
        .map(|p| match p.parse::<i64>() {
            Ok(n) => n.to_string(),
            Err(_) => format!("'{}'", p),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

fn get_schema(descriptor: &ResourceDescriptor) -> Value {
    let mut props = Map::new();
    let mut segments = path_segments_property(&sample_segments(descriptor));
    segments["minItems"] = json!(1);
    props.insert("path_segments".to_string(), segments);
    object_schema(props, &["path_segments"])
}

fn subresource_schema(descriptor: &ResourceDescriptor) -> Value {
    let mut props = Map::new();
    let mut segments = path_segments_property(&sample_segments(descriptor));
    segments["minItems"] = json!(1);
    props.insert("path_segments".to_string(), segments);
    props.insert(
        "subresource".to_string(),
        json!({
            "type": "string",
            "minLength": 1,
            "description": "Nested route such as 'text', 'actions', or 'text/versions'"
        }),
    );
    let page = page_properties();
    for key in ["limit", "offset"] {
        if let Some(v) = page.get(key) {
            props.insert(key.to_string(), v.clone());
        }
    }
    object_schema(props, &["path_segments", "subresource"])
}
