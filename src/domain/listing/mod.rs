//! Query construction and row-state rules for the network sites listing.
//!
//! Everything here is pure: no I/O, no clock, no configuration. The
//! application layer feeds request parameters in and executes the
//! resulting queries through [`crate::domain::repositories::SiteRepository`].
//!
//! - [`search`] - classifies the `s` parameter
//! - [`query`] - filter planning plus listing and count queries
//! - [`pagination_policy`] - exact vs. page-sized totals, default ordering
//! - [`row_state`] - badges, row actions, bulk actions
//! - [`columns`] - table columns and cell formatting

pub mod columns;
pub mod like_pattern;
pub mod page;
pub mod pagination_policy;
pub mod query;
pub mod row_state;
pub mod search;
pub mod sort;

pub use columns::{Column, DisplayMode, USERS_SHOWN};
pub use like_pattern::LikePattern;
pub use page::PageWindow;
pub use pagination_policy::{CountStrategy, PaginationPolicy};
pub use query::{FilterPlan, NO_SITE_ID, SiteCountQuery, SiteFilter, SiteQuery, plan_filter};
pub use row_state::{
    ActionKey, Badge, BulkAction, RowAction, RowActionExtension, RowContext, RowState,
    bulk_actions,
};
pub use search::{SearchKind, SearchQuery};
pub use sort::{SortColumn, SortDirection, SortField, SortSpec};
