//! Amendment types returned by the `/amendment` endpoints.
//!
//! These are the only typed records in the crate; every other resource is
//! passed through as raw JSON. Only `number`, `congress` and `type` are
//! required. Unknown fields are ignored and nested records are lenient, so
//! a quirk in a nested block never costs the whole amendment.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::{Pagination, RequestInfo};

/// Chamber prefix of an amendment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmendmentType {
    /// House amendment.
    Hamdt,
    /// Senate amendment.
    Samdt,
    /// Senate unprinted amendment (older congresses).
    Suamdt,
}

impl AmendmentType {
    pub const ALL: [AmendmentType; 3] =
        [AmendmentType::Hamdt, AmendmentType::Samdt, AmendmentType::Suamdt];

    /// Uppercase code as the API reports it (`HAMDT`).
    pub fn as_str(&self) -> &'static str {
        match self {
            AmendmentType::Hamdt => "HAMDT",
            AmendmentType::Samdt => "SAMDT",
            AmendmentType::Suamdt => "SUAMDT",
        }
    }

    /// Lowercase form used in URL paths (`hamdt`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            AmendmentType::Hamdt => "hamdt",
            AmendmentType::Samdt => "samdt",
            AmendmentType::Suamdt => "suamdt",
        }
    }
}

impl std::fmt::Display for AmendmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AmendmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HAMDT" => Ok(AmendmentType::Hamdt),
            "SAMDT" => Ok(AmendmentType::Samdt),
            "SUAMDT" => Ok(AmendmentType::Suamdt),
            _ => Err(format!(
                "unknown amendment type '{}', expected one of HAMDT, SAMDT, SUAMDT",
                s
            )),
        }
    }
}

impl Serialize for AmendmentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AmendmentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The API is inconsistent about numbers: `congress` is a JSON number while
/// `number` usually arrives as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u32),
    Text(String),
}

impl NumberOrString {
    fn into_u32<E: de::Error>(self) -> Result<u32, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid number '{}'", s))),
        }
    }
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_u32()
}

fn opt_number_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    // Nested records are lenient: an unparseable number becomes `None`.
    Ok(Option::<NumberOrString>::deserialize(deserializer)?
        .and_then(|raw| raw.into_u32::<D::Error>().ok()))
}

/// A single amendment, as found in list pages and detail responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Amendment {
    #[serde(deserialize_with = "number_or_string")]
    pub number: u32,

    #[serde(deserialize_with = "number_or_string")]
    pub congress: u32,

    #[serde(rename = "type")]
    pub amendment_type: AmendmentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamber: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_action: Option<LatestAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsors: Option<Vec<Sponsor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_behalf_of_sponsor: Option<Vec<OnBehalfOfSponsor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosponsors: Option<Cosponsors>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amended_bill: Option<AmendedBill>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amended_amendment: Option<AmendedAmendment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendments_to_amendment: Option<CountRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Notes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amended_treaty: Option<AmendedTreaty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<CountRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_versions: Option<CountRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Amendment {
    /// Date of the latest action, when present and well-formed.
    pub fn latest_action_date(&self) -> Option<NaiveDate> {
        self.latest_action.as_ref().and_then(LatestAction::date)
    }

    /// Whether any listed sponsor carries this bioguide id.
    pub fn is_sponsored_by(&self, bioguide_id: &str) -> bool {
        self.sponsors.iter().flatten().any(|s| {
            s.bioguide_id
                .as_deref()
                .is_some_and(|id| id.eq_ignore_ascii_case(bioguide_id))
        })
    }
}

/// Latest action taken on an amendment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LatestAction {
    pub action_date: Option<String>,
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_time: Option<String>,
}

impl LatestAction {
    /// Parses `actionDate` (`YYYY-MM-DD`).
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.action_date.as_deref()?;
        NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
    }
}

/// Member sponsoring an amendment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub bioguide_id: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub district: Option<u32>,
    pub url: Option<String>,
}

/// Member who submitted an amendment on behalf of its sponsor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OnBehalfOfSponsor {
    pub bioguide_id: Option<String>,
    pub full_name: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

/// Count-and-link reference to a nested collection (actions, text versions, ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CountRef {
    pub count: Option<i64>,
    pub url: Option<String>,
}

/// Cosponsor summary attached to an amendment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cosponsors {
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_including_withdrawn_cosponsors: Option<i64>,
    pub url: Option<String>,
}

/// Bill an amendment amends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AmendedBill {
    #[serde(default, deserialize_with = "opt_number_or_string")]
    pub congress: Option<u32>,
    #[serde(rename = "type")]
    pub bill_type: Option<String>,
    #[serde(default, deserialize_with = "opt_number_or_string")]
    pub number: Option<u32>,
    pub origin_chamber: Option<String>,
    pub origin_chamber_code: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Amendment that another amendment amends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AmendedAmendment {
    #[serde(default, deserialize_with = "opt_number_or_string")]
    pub congress: Option<u32>,
    #[serde(rename = "type")]
    pub amendment_type: Option<String>,
    #[serde(default, deserialize_with = "opt_number_or_string")]
    pub number: Option<u32>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub url: Option<String>,
}

/// Treaty an amendment amends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AmendedTreaty {
    #[serde(default, deserialize_with = "opt_number_or_string")]
    pub congress: Option<u32>,
    #[serde(default, deserialize_with = "opt_number_or_string")]
    pub treaty_number: Option<u32>,
    pub url: Option<String>,
}

/// A single note on an amendment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub text: Option<String>,
}

/// Notes arrive either wrapped in `{"item": [...]}` or as a bare array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Notes {
    Wrapped { item: Vec<Note> },
    List(Vec<Note>),
}

/// One page of amendments.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AmendmentsResponse {
    pub amendments: Vec<Amendment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestInfo>,
    /// Records on the page that did not conform and were left out.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub dropped: usize,
}

/// Detail response for a single amendment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AmendmentResponse {
    pub amendment: Amendment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestInfo>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}
