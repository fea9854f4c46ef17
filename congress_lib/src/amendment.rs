//! Typed amendment access on top of [`ResourceService`].
//!
//! List pages are decoded record by record: one malformed amendment is
//! logged and dropped, the rest of the page survives. The search helpers
//! scan a single page of up to 250 amendments client-side, since the API
//! offers no text or sponsor filter for this collection.

use chrono::{Duration, NaiveDate, Utc};
use congress_api::types::{
    Amendment, AmendmentResponse, AmendmentType, AmendmentsResponse, Pagination, RequestInfo,
};
use congress_api::{ListQuery, Query, MAX_LIMIT};
use serde_json::Value;

use crate::error::GatewayError;
use crate::resource::{PathSegment, ResourceService, AMENDMENT};

/// Upper bound on results returned by a text search.
pub const MAX_SEARCH_RESULTS: usize = 50;

#[derive(Clone)]
pub struct AmendmentService {
    resources: ResourceService,
}

impl AmendmentService {
    pub fn new(resources: ResourceService) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &ResourceService {
        &self.resources
    }

    /// Lists amendments, optionally narrowed to one congress and chamber type.
    ///
    /// A type without a congress cannot be expressed as a path and is rejected.
    pub async fn list(
        &self,
        congress: Option<u32>,
        amendment_type: Option<AmendmentType>,
        query: ListQuery,
    ) -> Result<AmendmentsResponse, GatewayError> {
        let mut scope: Vec<PathSegment> = Vec::new();
        match (congress, amendment_type) {
            (None, Some(t)) => {
                return Err(GatewayError::InvalidInput(format!(
                    "amendment_type {} requires a congress",
                    t
                )))
            }
            (Some(c), t) => {
                scope.push(c.into());
                if let Some(t) = t {
                    scope.push(t.path_segment().into());
                }
            }
            (None, None) => {}
        }

        let raw = self.resources.list_in(&AMENDMENT, scope, query).await?;
        parse_amendments_page(raw.into_inner())
    }

    /// Fetches one amendment's detail record.
    pub async fn get(
        &self,
        congress: u32,
        amendment_type: AmendmentType,
        number: u32,
    ) -> Result<AmendmentResponse, GatewayError> {
        let segments = vec![
            PathSegment::from(congress),
            PathSegment::from(amendment_type.path_segment()),
            PathSegment::from(number),
        ];
        let raw = self.resources.get(&AMENDMENT, segments).await?;
        Ok(serde_json::from_value(raw.into_inner())?)
    }

    /// Case-insensitive substring search over `description` and `purpose`.
    ///
    /// Scans one page of up to 250 amendments and returns at most
    /// [`MAX_SEARCH_RESULTS`] matches, in the order the API returned them.
    pub async fn search_by_text(
        &self,
        query: &str,
        congress: Option<u32>,
        limit: Option<usize>,
    ) -> Result<AmendmentsResponse, GatewayError> {
        let needle = query.to_lowercase();
        let cap = limit.unwrap_or(MAX_SEARCH_RESULTS).min(MAX_SEARCH_RESULTS);
        let page = self.scan_page(congress).await?;
        Ok(filter_page(page, cap, |a| matches_text(a, &needle)))
    }

    /// Amendments on one page whose sponsors include `bioguide_id`.
    pub async fn by_sponsor(
        &self,
        bioguide_id: &str,
        congress: Option<u32>,
        limit: Option<usize>,
    ) -> Result<AmendmentsResponse, GatewayError> {
        let page = self.scan_page(congress).await?;
        Ok(filter_page(page, limit.unwrap_or(usize::MAX), |a| {
            a.is_sponsored_by(bioguide_id)
        }))
    }

    /// Amendments whose latest action falls within the last `days_back` days.
    pub async fn recent(
        &self,
        congress: Option<u32>,
        days_back: i64,
        limit: Option<usize>,
    ) -> Result<AmendmentsResponse, GatewayError> {
        let cutoff = Utc::now().date_naive() - Duration::days(days_back);
        self.recent_since(congress, cutoff, limit).await
    }

    /// Amendments whose latest action is on or after `cutoff`. Records with
    /// no parseable action date are skipped.
    pub async fn recent_since(
        &self,
        congress: Option<u32>,
        cutoff: NaiveDate,
        limit: Option<usize>,
    ) -> Result<AmendmentsResponse, GatewayError> {
        let page = self.scan_page(congress).await?;
        Ok(filter_page(page, limit.unwrap_or(usize::MAX), |a| {
            a.latest_action_date().is_some_and(|d| d >= cutoff)
        }))
    }

    async fn scan_page(&self, congress: Option<u32>) -> Result<AmendmentsResponse, GatewayError> {
        self.list(congress, None, ListQuery::default().with_limit(MAX_LIMIT))
            .await
    }
}

fn matches_text(amendment: &Amendment, needle: &str) -> bool {
    [&amendment.description, &amendment.purpose]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn filter_page<F>(page: AmendmentsResponse, cap: usize, keep: F) -> AmendmentsResponse
where
    F: Fn(&Amendment) -> bool,
{
    AmendmentsResponse {
        amendments: page
            .amendments
            .into_iter()
            .filter(|a| keep(a))
            .take(cap)
            .collect(),
        ..page
    }
}

/// Decodes a raw `/amendment` list body.
///
/// Each element of `amendments` is decoded on its own; failures are counted
/// in `dropped` and logged. A body without an `amendments` array is a parse
/// error. A malformed `pagination` or `request` block is ignored.
pub fn parse_amendments_page(body: Value) -> Result<AmendmentsResponse, GatewayError> {
    let Value::Object(mut map) = body else {
        return Err(GatewayError::Parse(
            "expected a JSON object with an amendments array".to_string(),
        ));
    };
    let Some(Value::Array(items)) = map.remove("amendments") else {
        return Err(GatewayError::Parse(
            "response has no amendments array".to_string(),
        ));
    };

    let mut amendments = Vec::with_capacity(items.len());
    let mut dropped = 0;
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Amendment>(item) {
            Ok(a) => amendments.push(a),
            Err(e) => {
                dropped += 1;
                tracing::warn!("Dropping malformed amendment record at index {}: {}", idx, e);
            }
        }
    }

    let pagination = map
        .remove("pagination")
        .and_then(|v| serde_json::from_value::<Pagination>(v).ok());
    let request = map
        .remove("request")
        .and_then(|v| serde_json::from_value::<RequestInfo>(v).ok());

    Ok(AmendmentsResponse {
        amendments,
        pagination,
        request,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(number: &str, kind: &str, description: Option<&str>, purpose: Option<&str>) -> Value {
        json!({
            "number": number,
            "congress": 118,
            "type": kind,
            "description": description,
            "purpose": purpose,
        })
    }

    #[test]
    fn drops_record_missing_number() {
        let body = json!({
            "amendments": [
                record("12", "HAMDT", Some("An amendment"), None),
                {"congress": 118, "type": "HAMDT", "description": "no number"}
            ],
            "pagination": {"count": 2}
        });
        let page = parse_amendments_page(body).unwrap();
        assert_eq!(page.amendments.len(), 1);
        assert_eq!(page.amendments[0].number, 12);
        assert_eq!(page.dropped, 1);
        assert_eq!(page.pagination.unwrap().count, 2);
    }

    #[test]
    fn drops_record_with_unknown_type() {
        let body = json!({
            "amendments": [
                record("1", "XAMDT", None, None),
                record("2", "samdt", None, None)
            ]
        });
        let page = parse_amendments_page(body).unwrap();
        assert_eq!(page.amendments.len(), 1);
        assert_eq!(page.amendments[0].amendment_type, AmendmentType::Samdt);
        assert_eq!(page.dropped, 1);
    }

    #[test]
    fn missing_array_is_parse_error() {
        let err = parse_amendments_page(json!({"bills": []})).unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
        let err = parse_amendments_page(json!([1, 2])).unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[test]
    fn malformed_pagination_ignored() {
        let body = json!({"amendments": [], "pagination": "soon"});
        let page = parse_amendments_page(body).unwrap();
        assert!(page.pagination.is_none());
        assert_eq!(page.dropped, 0);
    }

    #[test]
    fn text_match_is_case_insensitive_on_either_field() {
        let by_purpose: Amendment =
            serde_json::from_value(record("1", "SAMDT", None, Some("Expand MEDICARE coverage"))).unwrap();
        let by_desc: Amendment =
            serde_json::from_value(record("2", "HAMDT", Some("medicare advantage"), None)).unwrap();
        let neither: Amendment =
            serde_json::from_value(record("3", "HAMDT", Some("Highway funds"), Some("Roads"))).unwrap();
        assert!(matches_text(&by_purpose, "medicare"));
        assert!(matches_text(&by_desc, "medicare"));
        assert!(!matches_text(&neither, "medicare"));
    }

    #[test]
    fn filter_keeps_order_and_cap() {
        let amendments = (1..=10)
            .map(|n| serde_json::from_value(record(&n.to_string(), "HAMDT", None, None)).unwrap())
            .collect();
        let page = AmendmentsResponse {
            amendments,
            dropped: 2,
            ..Default::default()
        };
        let out = filter_page(page, 3, |a| a.number % 2 == 0);
        let numbers: Vec<u32> = out.amendments.iter().map(|a| a.number).collect();
        assert_eq!(numbers, vec![2, 4, 6]);
        assert_eq!(out.dropped, 2);
    }
}
