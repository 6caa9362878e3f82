//! Pagination primitives
//!
//! Public list endpoints accept `?page=` and `?limit=` and reply with a
//! fixed envelope carrying page metadata next to the data. Query parsing is
//! deliberately lenient: anything that is not a positive integer silently
//! falls back to the defaults rather than failing the request.

use serde::{Deserialize, Serialize};

/// Page number used when the query omits or mangles `page`
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the query omits or mangles `limit`
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination query parameters, as extracted from the URL
///
/// Values stay strings so that `?page=abc` can be tolerated instead of
/// rejected during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Resolved pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number, always >= 1
    pub page: i64,
    /// Page size, always >= 1
    pub limit: i64,
}

impl Page {
    /// Resolves raw query parameters into a usable window
    ///
    /// Missing, non-numeric, zero, and negative values all fall back to the
    /// defaults.
    pub fn from_query(query: &PageQuery) -> Self {
        Self {
            page: parse_positive(query.page.as_deref(), DEFAULT_PAGE),
            limit: parse_positive(query.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => n,
        _ => default,
    }
}

/// Paginated response envelope
///
/// `count` is the number of items on this page; `total` is the number of
/// items across all pages. An empty collection yields `total_pages` of 0
/// while `current_page` still echoes the requested page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub count: usize,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wraps one page of rows with its metadata
    pub fn new(data: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            count: data.len(),
            total,
            total_pages: total_pages(total, page.limit),
            current_page: page.page,
            data,
        }
    }
}

/// Ceiling division of `total` by `limit`
fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let page = Page::from_query(&PageQuery::default());
        assert_eq!(page, Page { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_parses_valid_values() {
        let page = Page::from_query(&query(Some("3"), Some("25")));
        assert_eq!(page, Page { page: 3, limit: 25 });
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_non_numeric_falls_back_to_defaults() {
        let page = Page::from_query(&query(Some("abc"), Some("ten")));
        assert_eq!(page, Page { page: 1, limit: 10 });
    }

    #[test]
    fn test_zero_and_negative_fall_back_to_defaults() {
        let page = Page::from_query(&query(Some("0"), Some("-5")));
        assert_eq!(page, Page { page: 1, limit: 10 });
    }

    #[test]
    fn test_envelope_metadata() {
        let page = Page { page: 2, limit: 10 };
        let envelope = Paginated::new(vec![1, 2, 3], 23, page);

        assert_eq!(envelope.count, 3);
        assert_eq!(envelope.total, 23);
        assert_eq!(envelope.total_pages, 3);
        assert_eq!(envelope.current_page, 2);
    }

    #[test]
    fn test_envelope_exact_multiple() {
        let envelope = Paginated::new(vec![(); 10], 20, Page { page: 1, limit: 10 });
        assert_eq!(envelope.total_pages, 2);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let envelope: Paginated<i32> = Paginated::new(vec![], 0, Page { page: 4, limit: 10 });
        assert_eq!(envelope.total_pages, 0);
        assert_eq!(envelope.current_page, 4);
        assert_eq!(envelope.count, 0);
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let envelope = Paginated::new(vec![1], 1, Page::default());
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("totalPages").is_some());
        assert!(json.get("currentPage").is_some());
    }
}
