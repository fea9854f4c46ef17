mod common;
pub use self::common::{Query, QueryCommon, SortDirection, MAX_LIMIT};

mod list;
pub use self::list::ListQuery;
