//! Count and default-ordering policy for large networks.

use serde::Serialize;

use super::search::SearchQuery;
use super::sort::{SortColumn, SortDirection, SortSpec};

/// How `total_items` is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountStrategy {
    /// Run the count query before the listing query.
    Exact,
    /// Skip the count; report the rows on the current page.
    PageRows,
}

/// Decisions driven by the dataset-size signal.
///
/// On large networks an unbounded `COUNT` is too expensive, so the total is
/// approximated by the page size. Pagination widgets will under-report the
/// number of pages there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    large_dataset: bool,
}

impl PaginationPolicy {
    pub fn new(large_dataset: bool) -> Self {
        Self { large_dataset }
    }

    pub fn is_large_dataset(&self) -> bool {
        self.large_dataset
    }

    /// Ordering to apply for this request.
    ///
    /// A large network browsed without a search term and without any
    /// ordering parameters shows the newest registered sites first. Empty
    /// `orderby` / `order` values count as absent.
    pub fn effective_sort(
        &self,
        search: &SearchQuery,
        orderby: Option<&str>,
        order: Option<&str>,
    ) -> SortSpec {
        let orderby = orderby.filter(|v| !v.is_empty());
        let order = order.filter(|v| !v.is_empty());

        if self.large_dataset && search.is_empty() && orderby.is_none() && order.is_none() {
            return SortSpec::new(SortColumn::BlogId, SortDirection::Desc);
        }

        SortSpec::from_request(orderby, order)
    }

    pub fn count_strategy(&self) -> CountStrategy {
        if self.large_dataset {
            CountStrategy::PageRows
        } else {
            CountStrategy::Exact
        }
    }

    /// Total to report given the exact count (if one was run) and the rows
    /// actually returned.
    pub fn total_items(&self, exact: Option<i64>, page_rows: usize) -> i64 {
        match (self.count_strategy(), exact) {
            (CountStrategy::Exact, Some(total)) => total,
            _ => page_rows as i64,
        }
    }
}
