//! Listing filter normalization and page arithmetic.

use serde::Serialize;

/// Normalized listing filter.
///
/// Built once at the HTTP boundary from untrusted input; by the time a
/// filter reaches the query builder its terms are trimmed, non-empty
/// strings and its page is a positive number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Category name substring (case-insensitive).
    pub category: Option<String>,

    /// Keyword searched in title and content (case-insensitive).
    pub keyword: Option<String>,

    /// Requested page, 1-indexed.
    pub page: u32,
}

impl PostFilter {
    /// Build a filter from raw request input.
    ///
    /// Blank or whitespace-only terms count as absent. A page that is
    /// missing, non-numeric, zero, or negative becomes page 1.
    pub fn from_raw(category: Option<&str>, keyword: Option<&str>, page: Option<&str>) -> Self {
        Self {
            category: normalize_term(category),
            keyword: normalize_term(keyword),
            page: normalize_page(page),
        }
    }

    /// Rows skipped before this page.
    pub fn offset(&self, page_size: u32) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(page_size)
    }
}

fn normalize_term(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

/// One page of listing results with its pagination metadata.
///
/// Computed fresh per request, never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage<T> {
    /// Total rows matching the filter, across all pages.
    pub total_posts: u64,

    /// Total page count: ceil(total_posts / limit), 0 when nothing matches.
    pub total_pages: u32,

    /// The page these rows belong to (1-indexed).
    pub current_page: u32,

    /// Page size the listing was cut with.
    pub limit: u32,

    /// The rows, newest first.
    pub posts: Vec<T>,

    /// The next page number, absent on the last page.
    pub next_page: Option<u32>,
}

impl<T> PostPage<T> {
    /// Assemble a page descriptor from an executed statement pair.
    pub fn new(posts: Vec<T>, total_posts: u64, page: u32, page_size: u32) -> Self {
        let total_pages = if page_size > 0 {
            total_posts.div_ceil(u64::from(page_size)) as u32
        } else {
            0
        };

        let next_page = if page < total_pages {
            Some(page + 1)
        } else {
            None
        };

        Self {
            total_posts,
            total_pages,
            current_page: page,
            limit: page_size,
            posts,
            next_page,
        }
    }

    /// A page with no results.
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self::new(Vec::new(), 0, page, page_size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_are_absent() {
        let filter = PostFilter::from_raw(Some(""), Some("   "), None);
        assert_eq!(filter.category, None);
        assert_eq!(filter.keyword, None);
    }

    #[test]
    fn terms_are_trimmed() {
        let filter = PostFilter::from_raw(Some("  travel "), Some(" rust"), None);
        assert_eq!(filter.category.as_deref(), Some("travel"));
        assert_eq!(filter.keyword.as_deref(), Some("rust"));
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(PostFilter::from_raw(None, None, None).page, 1);
        assert_eq!(PostFilter::from_raw(None, None, Some("0")).page, 1);
        assert_eq!(PostFilter::from_raw(None, None, Some("-3")).page, 1);
        assert_eq!(PostFilter::from_raw(None, None, Some("abc")).page, 1);
        assert_eq!(PostFilter::from_raw(None, None, Some("")).page, 1);
    }

    #[test]
    fn page_parses_when_valid() {
        assert_eq!(PostFilter::from_raw(None, None, Some("4")).page, 4);
        assert_eq!(PostFilter::from_raw(None, None, Some(" 2 ")).page, 2);
    }

    #[test]
    fn offset_from_page() {
        let filter = PostFilter::from_raw(None, None, Some("1"));
        assert_eq!(filter.offset(6), 0);

        let filter = PostFilter::from_raw(None, None, Some("3"));
        assert_eq!(filter.offset(6), 12);
    }

    #[test]
    fn page_arithmetic() {
        let page = PostPage::<()>::new(Vec::new(), 100, 5, 10);
        assert_eq!(page.total_pages, 10);
        assert_eq!(page.current_page, 5);
        assert_eq!(page.next_page, Some(6));
    }

    #[test]
    fn last_page_has_no_next() {
        let page = PostPage::<()>::new(Vec::new(), 100, 10, 10);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn partial_last_page() {
        // 7 posts at 6 per page: page 1 full with a next, page 2 short without.
        let page = PostPage::new(vec![(); 6], 7, 1, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.next_page, Some(2));

        let page = PostPage::new(vec![()], 7, 2, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn empty_store() {
        let page = PostPage::<()>::empty(1, 6);
        assert_eq!(page.total_posts, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.posts.is_empty());
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn page_serializes_with_camel_case_keys() {
        let page = PostPage::<serde_json::Value>::empty(1, 6);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["totalPosts"], 0);
        assert_eq!(json["totalPages"], 0);
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["limit"], 6);
        assert!(json["nextPage"].is_null());
        assert!(json["posts"].as_array().unwrap().is_empty());
    }
}
