//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SortDirection`].

use std::str::FromStr;

use url::Url;

/// Largest page size the Congress.gov API accepts.
pub const MAX_LIMIT: u32 = 250;

/// Trait implemented by all query builders. Provides query-pair serialization and
/// shared builder methods for pagination, date filtering, and sorting.
pub trait Query {
    /// Returns this query's parameters as ordered key/value pairs.
    fn to_query_pairs(&self) -> Vec<(String, String)>;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        for (key, value) in self.to_query_pairs() {
            url.query_pairs_mut().append_pair(&key, &value);
        }
        url
    }

    /// Sets the number of results per page. Values above [`MAX_LIMIT`] are
    /// sent as-is; clamping is the caller's job.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = Some(limit);
        self
    }

    /// Sets the number of results to skip.
    fn with_offset(mut self, offset: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().offset = Some(offset);
        self
    }

    /// Only records updated at or after this timestamp (`YYYY-MM-DDT00:00:00Z`).
    fn with_from_date_time(mut self, from: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().from_date_time = Some(from.to_string());
        self
    }

    /// Only records updated at or before this timestamp (`YYYY-MM-DDT00:00:00Z`).
    fn with_to_date_time(mut self, to: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().to_date_time = Some(to.to_string());
        self
    }

    /// Sorts by update date in the given direction.
    fn with_sort_direction(mut self, sort_direction: SortDirection) -> Self
    where
        Self: Sized,
    {
        self.get_common().sort = Some(sort_direction);
        self
    }
}

/// Sort order for API results. The API only sorts by `updateDate`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (oldest first).
    Asc,
    /// Descending order (newest first). This is the default.
    #[default]
    Desc,
}
impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "updatedate+asc" | "updatedate asc" => Ok(SortDirection::Asc),
            "desc" | "updatedate+desc" | "updatedate desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}
impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortDirection::Asc => "updateDate asc",
                SortDirection::Desc => "updateDate desc",
            }
        )
    }
}

/// Fields shared by all query types: pagination, date filters, and sort order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryCommon {
    /// Results per page. `None` uses the API default (20).
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
    /// Lower bound on `updateDate`.
    pub from_date_time: Option<String>,
    /// Upper bound on `updateDate`.
    pub to_date_time: Option<String>,
    /// Sort order. `None` uses the API default.
    pub sort: Option<SortDirection>,
}

impl QueryCommon {
    /// Returns the common pagination, date, and sort parameters that are set.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(from) = &self.from_date_time {
            pairs.push(("fromDateTime".to_string(), from.clone()));
        }
        if let Some(to) = &self.to_date_time {
            pairs.push(("toDateTime".to_string(), to.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_string(), sort.to_string()));
        }
        pairs
    }
}
