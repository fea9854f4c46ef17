use congress_api::types::AmendmentType;
use congress_api::MAX_LIMIT;

use crate::error::GatewayError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_SEGMENT_LENGTH: usize = 80;
pub const MAX_DAYS_BACK: i64 = 365;
pub const MAX_FILTER_VALUE_LENGTH: usize = 256;

/// Query parameters the gateway sets itself. Filters may not shadow them.
const RESERVED_PARAMS: &[&str] = &[
    "api_key",
    "format",
    "limit",
    "offset",
    "fromdatetime",
    "todatetime",
    "sort",
    "cursor",
];

/// Highest congress number accepted. The 119th convened in 2025.
pub const MAX_CONGRESS: i64 = 200;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, GatewayError> {
    if input.len() > max_len {
        return Err(GatewayError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(GatewayError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a free-text search query: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, GatewayError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Clamp a requested page size into the range the API accepts (1..=250).
///
/// The generic services send whatever limit they are given; this is where
/// callers apply the remote maximum.
pub fn clamp_limit(limit: i64) -> u32 {
    limit.clamp(1, MAX_LIMIT as i64) as u32
}

/// Validate an offset (must be >= 0).
pub fn validate_offset(offset: i64) -> Result<u32, GatewayError> {
    u32::try_from(offset)
        .map_err(|_| GatewayError::InvalidInput("offset must be between 0 and 4294967295".to_string()))
}

/// Validate a congress number (1..=200).
pub fn validate_congress(congress: i64) -> Result<u32, GatewayError> {
    if !(1..=MAX_CONGRESS).contains(&congress) {
        return Err(GatewayError::InvalidInput(format!(
            "congress must be between 1 and {}, got {}",
            MAX_CONGRESS, congress
        )));
    }
    Ok(congress as u32)
}

/// Validate an amendment type: case-insensitive HAMDT, SAMDT, or SUAMDT.
pub fn validate_amendment_type(input: &str) -> Result<AmendmentType, GatewayError> {
    input.parse().map_err(GatewayError::InvalidInput)
}

/// Validate a positive amendment or bill number.
pub fn validate_number(number: i64) -> Result<u32, GatewayError> {
    u32::try_from(number)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| GatewayError::InvalidInput(format!("number must be >= 1, got {}", number)))
}

/// Validate a bioguide id: one letter followed by six digits (e.g. `S001191`).
/// Returns it uppercased.
pub fn validate_bioguide_id(input: &str) -> Result<String, GatewayError> {
    let upper = input.trim().to_uppercase();
    let mut chars = upper.chars();
    let well_formed = upper.len() == 7
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_digit());
    if well_formed {
        Ok(upper)
    } else {
        Err(GatewayError::InvalidInput(format!(
            "invalid bioguide id '{}', expected a letter followed by six digits (e.g. S001191)",
            input
        )))
    }
}

/// Validate the look-back window for recent amendments (1..=365 days).
pub fn validate_days_back(days: i64) -> Result<i64, GatewayError> {
    if !(1..=MAX_DAYS_BACK).contains(&days) {
        return Err(GatewayError::InvalidInput(format!(
            "days_back must be between 1 and {}",
            MAX_DAYS_BACK
        )));
    }
    Ok(days)
}

/// Validate one URL path segment. Segments are spliced into the request
/// path, so anything that would change the URL structure is rejected,
/// including interior slashes and percent escapes (`x/../..`, `%2e%2e`).
pub fn validate_segment(input: &str) -> Result<String, GatewayError> {
    let cleaned = sanitize_text(input.trim_matches('/'), MAX_SEGMENT_LENGTH)?;
    if cleaned == "."
        || cleaned == ".."
        || cleaned.contains(['/', '%', '?', '#', '\\'])
    {
        return Err(GatewayError::InvalidInput(format!(
            "invalid path segment '{}'",
            input
        )));
    }
    Ok(cleaned)
}

/// Validate an extra filter parameter name. Names are plain identifiers
/// and must not collide with a parameter the gateway sends itself.
pub fn validate_filter_key(input: &str) -> Result<String, GatewayError> {
    let cleaned = sanitize_text(input, MAX_SEGMENT_LENGTH)?;
    if !cleaned.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GatewayError::InvalidInput(format!(
            "invalid filter name '{}'",
            input
        )));
    }
    if RESERVED_PARAMS.contains(&cleaned.to_ascii_lowercase().as_str()) {
        return Err(GatewayError::InvalidInput(format!(
            "filter '{}' is reserved",
            cleaned
        )));
    }
    Ok(cleaned)
}

/// Validate a subresource route. It may span several segments
/// (`text/versions`); each is validated on its own.
pub fn validate_subresource(input: &str) -> Result<Vec<String>, GatewayError> {
    let parts: Vec<&str> = input.split('/').filter(|p| !p.trim().is_empty()).collect();
    if parts.is_empty() {
        return Err(GatewayError::InvalidInput(
            "subresource must be a non-empty string".to_string(),
        ));
    }
    parts.into_iter().map(validate_segment).collect()
}
