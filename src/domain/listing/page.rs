//! Page window arithmetic.

use serde::Serialize;

/// A bounded slice of the listing.
///
/// Both bounds are clamped at construction, so `offset()` and `limit()` are
/// never negative whatever the request carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    page: i64,
    per_page: i64,
}

impl PageWindow {
    /// Page numbers below 1 clamp to 1; a per-page value below 1 clamps to 1.
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Number of pages needed for `total_items`.
    pub fn total_pages(&self, total_items: i64) -> i64 {
        if total_items <= 0 {
            0
        } else {
            (total_items + self.per_page - 1) / self.per_page
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_clamps_page_numbers() {
        for (page, expected) in [(-5, 0), (0, 0), (1, 0), (7, 120)] {
            let window = PageWindow::new(page, 20);
            assert_eq!(window.offset(), expected, "page {page}");
            assert_eq!(window.offset(), (page.max(1) - 1) * 20);
            assert_eq!(window.limit(), 20);
        }
    }

    #[test]
    fn test_non_positive_per_page_clamps() {
        let window = PageWindow::new(3, -10);
        assert_eq!(window.per_page(), 1);
        assert_eq!(window.offset(), 2);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let window = PageWindow::new(i64::MAX, 999);
        assert!(window.offset() >= 0);
    }

    #[test]
    fn test_total_pages() {
        let window = PageWindow::new(1, 20);
        assert_eq!(window.total_pages(0), 0);
        assert_eq!(window.total_pages(20), 1);
        assert_eq!(window.total_pages(21), 2);
    }
}
