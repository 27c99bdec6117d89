//! # Pagination
//!
//! Page metadata returned with every list endpoint, and the query used to ask
//! for a page.

use serde::{Deserialize, Serialize};

/// Page metadata. Listings and conversations send the page count as `pages`,
/// notifications as `totalPages`; both land in `total_pages`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(alias = "pages")]
    pub total_pages: u32,
}

impl PageMeta {
    /// Build metadata for `total` items served `limit` per page.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }

    /// True when `page` lies past the last page; such a page is empty, not an error.
    pub fn is_past_end(&self) -> bool {
        self.page > self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// `ceil(total / limit)`; zero when there is nothing to show or `limit` is zero.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn meta_accepts_both_page_count_names() {
        let listings: PageMeta =
            serde_json::from_str(r#"{"total":21,"page":1,"limit":10,"pages":3}"#).unwrap();
        let notifications: PageMeta =
            serde_json::from_str(r#"{"page":1,"limit":10,"total":21,"totalPages":3}"#).unwrap();
        assert_eq!(listings, notifications);
        assert_eq!(listings, PageMeta::new(1, 10, 21));
    }

    #[test]
    fn page_past_the_end_is_detected() {
        let meta = PageMeta::new(4, 10, 25);
        assert!(meta.is_past_end());
        assert!(!meta.has_next());
        assert!(meta.has_previous());
    }
}
