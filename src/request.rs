//! Query-string parameters to [`QueryOptions`].
//!
//! ```text
//! ?page=2&pageSize=50&sortBy=name,created_at&sortOrder=asc,desc
//!   &search=john&searchColumns=name,email&preload=Role&includeArchived=true&status=active
//! ```
//!
//! Every parameter not listed in [`RESERVED_PARAMS`] becomes an exact-match filter.

use crate::options::{default_query_options, FilterValue, QueryOptions, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "pageSize";
pub const SORT_BY: &str = "sortBy";
pub const SORT_ORDER: &str = "sortOrder";
pub const SEARCH: &str = "search";
pub const SEARCH_COLUMNS: &str = "searchColumns";
pub const PRELOAD: &str = "preload";
pub const INCLUDE_ARCHIVED: &str = "includeArchived";

pub const RESERVED_PARAMS: [&str; 8] = [
    PAGE,
    PAGE_SIZE,
    SORT_BY,
    SORT_ORDER,
    SEARCH,
    SEARCH_COLUMNS,
    PRELOAD,
    INCLUDE_ARCHIVED,
];

fn first<'a, K, V>(pairs: &'a [(K, V)], key: &str) -> Option<&'a str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .find(|(k, _)| k.as_ref() == key)
        .map(|(_, v)| v.as_ref())
}

/// First non-empty value of `key`.
fn non_empty<'a, K, V>(pairs: &'a [(K, V)], key: &str) -> Option<&'a str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    first(pairs, key).filter(|v| !v.is_empty())
}

fn positive_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|n| *n > 0)
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(str::to_string).collect()
}

/// Parse decoded query pairs, in request order. Repeated keys: the first value wins.
pub fn parse_query_options<K, V>(pairs: &[(K, V)]) -> QueryOptions
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut opts = default_query_options();

    if let Some(page) = non_empty(pairs, PAGE).and_then(positive_int) {
        opts.page = page;
    }
    if let Some(page_size) = non_empty(pairs, PAGE_SIZE).and_then(positive_int) {
        opts.page_size = page_size;
    }
    if let Some(v) = non_empty(pairs, SORT_BY) {
        opts.sort_by = split_list(v);
    }
    if let Some(v) = non_empty(pairs, SORT_ORDER) {
        opts.sort_order = split_list(v);
    }
    if let Some(v) = non_empty(pairs, SEARCH) {
        opts.search = v.to_string();
    }
    if let Some(v) = non_empty(pairs, SEARCH_COLUMNS) {
        opts.search_columns = split_list(v);
    }
    if let Some(v) = non_empty(pairs, PRELOAD) {
        opts.preload = split_list(v);
    }
    if let Some(v) = non_empty(pairs, INCLUDE_ARCHIVED) {
        opts.include_archived = v == "true" || v == "1";
    }

    for (k, v) in pairs {
        let key = k.as_ref();
        if RESERVED_PARAMS.contains(&key) {
            continue;
        }
        opts.filters
            .entry(key.to_string())
            .or_insert_with(|| FilterValue::Text(v.as_ref().to_string()));
    }

    opts
}

/// `page` from the query string, or 1 when missing or invalid.
pub fn page_from_pairs<K, V>(pairs: &[(K, V)]) -> i64
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    first(pairs, PAGE).and_then(positive_int).unwrap_or(DEFAULT_PAGE)
}

/// `pageSize` from the query string: 20 when missing or invalid, at most 100.
pub fn page_size_from_pairs<K, V>(pairs: &[(K, V)]) -> i64
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    first(pairs, PAGE_SIZE)
        .and_then(positive_int)
        .map(|n| n.min(MAX_PAGE_SIZE))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
