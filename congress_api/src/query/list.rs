use super::{common::QueryCommon, Query};

/// Query for any collection endpoint.
///
/// Besides the common pagination fields it carries the opaque pagination
/// cursor handed out by the API and arbitrary extra filters, both passed
/// through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub common: QueryCommon,
    pub cursor: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl Query for ListQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.common.to_query_pairs();
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor".to_string(), cursor.clone()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}

impl ListQuery {
    /// Passes the API's pagination cursor back unchanged.
    pub fn with_cursor(mut self, cursor: &str) -> Self {
        self.cursor = Some(cursor.to_string());
        self
    }

    /// Adds a free-form query parameter.
    pub fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.extra.push((key.to_string(), value.to_string()));
        self
    }
}
