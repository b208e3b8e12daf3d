//! Page/limit handling shared by every list endpoint.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub(crate) fn default_page() -> u64 {
    1
}

pub(crate) fn default_limit() -> u64 {
    10
}

/// 1-based page request. `limit` has no upper bound on purpose; callers
/// asking for huge pages get huge pages.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Store offset for this page. Page 0 is treated like page 1.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Page metadata returned alongside every list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

impl PageMeta {
    pub fn new(total_items: u64, page: &PageRequest) -> Self {
        // limit 0 yields zero pages rather than dividing by zero
        let total_pages = if page.limit == 0 {
            0
        } else {
            total_items.div_ceil(page.limit)
        };

        Self {
            current_page: page.page,
            total_pages,
            total_items,
            items_per_page: page.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(2, 10).offset(), 10);
        assert_eq!(PageRequest::new(5, 25).offset(), 100);
    }

    #[test]
    fn test_page_zero_behaves_like_page_one() {
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let meta = PageMeta::new(21, &PageRequest::new(1, 10));
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_items, 21);
        assert_eq!(meta.items_per_page, 10);
    }

    #[test]
    fn test_exact_division() {
        let meta = PageMeta::new(20, &PageRequest::new(2, 10));
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.current_page, 2);
    }

    #[test]
    fn test_limit_zero_yields_zero_pages() {
        let meta = PageMeta::new(42, &PageRequest::new(1, 0));
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.items_per_page, 0);
    }

    #[test]
    fn test_defaults() {
        let page = PageRequest::default();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PageMeta::new(3, &PageRequest::default());
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalItems"], 3);
        assert_eq!(json["itemsPerPage"], 10);
    }
}
