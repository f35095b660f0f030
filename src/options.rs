//! Parsed list-request intent: pagination, sort, search, filters, preloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// First page (pages are 1-indexed).
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Scalar value of an exact-match filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Int(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `desc` is descending; anything else is ascending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderTerm {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        OrderTerm {
            column: column.into(),
            direction,
        }
    }
}

impl fmt::Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.as_sql().to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: Vec<String>,
    /// Paired with `sort_by` by position; may be shorter (missing entries sort ascending).
    pub sort_order: Vec<String>,
    pub search: String,
    /// When empty, the entity's searchable columns are used.
    pub search_columns: Vec<String>,
    /// Exact-match conditions. Keys are not checked against any whitelist.
    pub filters: BTreeMap<String, FilterValue>,
    pub preload: Vec<String>,
    pub include_archived: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        default_query_options()
    }
}

/// Page 1 of 20, newest first.
pub fn default_query_options() -> QueryOptions {
    QueryOptions {
        page: DEFAULT_PAGE,
        page_size: DEFAULT_PAGE_SIZE,
        sort_by: vec!["created_at".into()],
        sort_order: vec!["desc".into()],
        search: String::new(),
        search_columns: Vec::new(),
        filters: BTreeMap::new(),
        preload: Vec::new(),
        include_archived: false,
    }
}

/// Normalize page (>= 1) and page size (1..=100, 20 when unset or invalid).
pub fn paginate(page: i64, page_size: i64) -> (i64, i64) {
    let page = if page < 1 { DEFAULT_PAGE } else { page };
    let page_size = if page_size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size.min(MAX_PAGE_SIZE)
    };
    (page, page_size)
}

impl QueryOptions {
    /// Normalized (page, page_size).
    pub fn pagination(&self) -> (i64, i64) {
        paginate(self.page, self.page_size)
    }

    /// Row offset of the normalized page.
    pub fn offset(&self) -> i64 {
        let (page, page_size) = self.pagination();
        (page - 1).saturating_mul(page_size)
    }

    /// Clear the default `created_at desc` sort so entity defaults apply.
    pub fn without_sort(mut self) -> Self {
        self.sort_by.clear();
        self.sort_order.clear();
        self
    }

    /// Restrict to the soft-deleted partition regardless of `includeArchived`.
    pub fn archived_only(mut self) -> Self {
        self.include_archived = true;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = default_query_options();
        assert_eq!(o.page, 1);
        assert_eq!(o.page_size, 20);
        assert_eq!(o.sort_by, vec!["created_at"]);
        assert_eq!(o.sort_order, vec!["desc"]);
        assert!(o.search.is_empty());
        assert!(o.filters.is_empty());
        assert!(!o.include_archived);
        assert_eq!(QueryOptions::default(), o);
    }

    #[test]
    fn paginate_normalizes_page() {
        for p in [-5, 0] {
            assert_eq!(paginate(p, 20).0, 1);
        }
        for p in [1, 2, 999] {
            assert_eq!(paginate(p, 20).0, p);
        }
    }

    #[test]
    fn paginate_bounds_page_size() {
        assert_eq!(paginate(1, 0).1, 20);
        assert_eq!(paginate(1, -3).1, 20);
        assert_eq!(paginate(1, 500).1, 100);
        assert_eq!(paginate(1, 100).1, 100);
        assert_eq!(paginate(1, 1).1, 1);
        for size in -10..200 {
            let (_, s) = paginate(1, size);
            assert!((1..=MAX_PAGE_SIZE).contains(&s));
        }
    }

    #[test]
    fn offset_uses_normalized_values() {
        let o = QueryOptions { page: 3, page_size: 500, ..default_query_options() };
        assert_eq!(o.offset(), 200);
        let o = QueryOptions { page: 0, page_size: 0, ..default_query_options() };
        assert_eq!(o.offset(), 0);
    }

    #[test]
    fn sort_direction_parse_is_case_insensitive() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("descending"), SortDirection::Asc);
        assert_eq!(SortDirection::parse(""), SortDirection::Asc);
    }

    #[test]
    fn filter_value_json_is_untagged() {
        let v: BTreeMap<String, FilterValue> =
            serde_json::from_str(r#"{"a": null, "b": true, "c": 3, "d": 1.5, "e": "x"}"#).unwrap();
        assert_eq!(v["a"], FilterValue::Null);
        assert_eq!(v["b"], FilterValue::Bool(true));
        assert_eq!(v["c"], FilterValue::Int(3));
        assert_eq!(v["d"], FilterValue::Float(1.5));
        assert_eq!(v["e"], FilterValue::Text("x".into()));
    }
}
