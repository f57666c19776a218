//! Listing and count queries for the sites table.
//!
//! Building happens in two steps because an address search needs a round
//! trip to the registration log before the filter is known:
//!
//! 1. [`plan_filter`] turns a [`SearchQuery`] into a [`FilterPlan`].
//! 2. A resolved [`SiteFilter`] plus sort and paging becomes a [`SiteQuery`];
//!    [`SiteQuery::count_query`] derives the matching [`SiteCountQuery`].

use crate::domain::entities::Network;

use super::like_pattern::LikePattern;
use super::page::PageWindow;
use super::search::{SearchKind, SearchQuery};
use super::sort::{SortDirection, SortField, SortSpec};

/// Identifier no site ever has. Used to force an empty result.
pub const NO_SITE_ID: i64 = 0;

/// Row predicate applied on top of the network scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteFilter {
    /// Every site of the network.
    All,
    /// `id = ?`
    IdEquals(i64),
    /// `id IN (?, ...)`; never empty.
    IdIn(Vec<i64>),
    /// `domain ILIKE ?`
    DomainLike(LikePattern),
    /// `path ILIKE ?`
    PathLike(LikePattern),
}

impl SiteFilter {
    /// Builds the filter for ids resolved from the registration log.
    ///
    /// No matches yields `id IN (0)`: an empty address lookup must return
    /// nothing, never the unfiltered listing.
    pub fn from_ip_matches(mut ids: Vec<i64>) -> Self {
        if ids.is_empty() {
            ids.push(NO_SITE_ID);
        }
        SiteFilter::IdIn(ids)
    }

    pub fn is_unfiltered(&self) -> bool {
        matches!(self, SiteFilter::All)
    }
}

/// Outcome of planning a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPlan {
    /// The filter is known.
    Ready(SiteFilter),
    /// Site ids must first be looked up by registration IP with this pattern.
    ResolveIps(LikePattern),
}

/// Plans the filter predicate for a search within `network`.
pub fn plan_filter(search: &SearchQuery, network: &Network) -> FilterPlan {
    let term = search.term();
    let wildcard = search.wildcard();

    match search.kind() {
        SearchKind::None => FilterPlan::Ready(SiteFilter::All),
        SearchKind::Ipv4 => {
            FilterPlan::ResolveIps(LikePattern::new().literal(term).wildcard_if(wildcard))
        }
        SearchKind::NumericId => match term.parse::<i64>() {
            Ok(id) => FilterPlan::Ready(SiteFilter::IdEquals(id)),
            Err(_) => FilterPlan::Ready(SiteFilter::IdEquals(NO_SITE_ID)),
        },
        SearchKind::DomainText => {
            let suffix = network.domain_suffix();
            let label = term.replace(&suffix, "");
            let pattern = LikePattern::new()
                .literal(label)
                .wildcard_if(wildcard)
                .literal(suffix);
            FilterPlan::Ready(SiteFilter::DomainLike(pattern))
        }
        SearchKind::PathText => {
            let stripped = term.trim_matches('/');
            let pattern = if stripped != network.path.trim_matches('/') {
                LikePattern::new()
                    .literal(format!("{}{}", network.path, stripped))
                    .wildcard_if(wildcard)
                    .literal("/")
            } else {
                LikePattern::new().literal(term)
            };
            FilterPlan::Ready(SiteFilter::PathLike(pattern))
        }
    }
}

/// A bounded listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteQuery {
    pub network_id: i64,
    pub filter: SiteFilter,
    pub order: Option<(SortField, SortDirection)>,
    pub window: PageWindow,
}

impl SiteQuery {
    pub fn new(network: &Network, filter: SiteFilter, sort: SortSpec, window: PageWindow) -> Self {
        Self {
            network_id: network.id,
            filter,
            order: sort.resolve(network.install_mode),
            window,
        }
    }

    /// The count query for the same rows, without ordering or paging.
    pub fn count_query(&self) -> SiteCountQuery {
        SiteCountQuery {
            network_id: self.network_id,
            filter: self.filter.clone(),
        }
    }
}

/// Counts the rows a [`SiteQuery`] would page through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCountQuery {
    pub network_id: i64,
    pub filter: SiteFilter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::InstallMode;
    use crate::domain::listing::sort::SortColumn;

    fn subdomain_network() -> Network {
        Network::new(
            1,
            "example.com".to_string(),
            "/".to_string(),
            InstallMode::Subdomain,
            1,
        )
    }

    fn subdirectory_network() -> Network {
        Network::new(
            1,
            "example.com".to_string(),
            "/".to_string(),
            InstallMode::Subdirectory,
            1,
        )
    }

    fn plan(raw: &str, network: &Network) -> FilterPlan {
        plan_filter(&SearchQuery::parse(raw, network.install_mode), network)
    }

    fn like(plan: FilterPlan) -> String {
        match plan {
            FilterPlan::Ready(SiteFilter::DomainLike(p))
            | FilterPlan::Ready(SiteFilter::PathLike(p))
            | FilterPlan::ResolveIps(p) => p.to_like(),
            other => panic!("expected a LIKE pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_search_is_unfiltered() {
        assert_eq!(
            plan("", &subdomain_network()),
            FilterPlan::Ready(SiteFilter::All)
        );
    }

    #[test]
    fn test_numeric_search_is_exact_id() {
        assert_eq!(
            plan("42", &subdomain_network()),
            FilterPlan::Ready(SiteFilter::IdEquals(42))
        );
    }

    #[test]
    fn test_ip_search_resolves_through_registration_log() {
        let network = subdomain_network();
        assert_eq!(like(plan("10.0.0.1", &network)), "10.0.0.1");
        assert_eq!(like(plan("10.0.*", &network)), "10.0.%");
    }

    #[test]
    fn test_empty_ip_match_forces_sentinel() {
        assert_eq!(
            SiteFilter::from_ip_matches(vec![]),
            SiteFilter::IdIn(vec![NO_SITE_ID])
        );
        assert_eq!(
            SiteFilter::from_ip_matches(vec![4, 9]),
            SiteFilter::IdIn(vec![4, 9])
        );
    }

    #[test]
    fn test_domain_search_strips_network_suffix() {
        let network = subdomain_network();
        assert_eq!(like(plan("shop.example.com", &network)), "shop.example.com");
        assert_eq!(like(plan("shop", &network)), "shop.example.com");
        assert_eq!(like(plan("sh*", &network)), "sh%.example.com");
    }

    #[test]
    fn test_domain_search_escapes_metacharacters() {
        assert_eq!(
            like(plan("my_shop", &subdomain_network())),
            "my\\_shop.example.com"
        );
    }

    #[test]
    fn test_path_search_prefixes_base_path() {
        let network = subdirectory_network();
        assert_eq!(like(plan("blog", &network)), "/blog/");
        assert_eq!(like(plan("/blog/", &network)), "/blog/");
        assert_eq!(like(plan("bl*", &network)), "/bl%/");
    }

    #[test]
    fn test_path_search_matching_base_path_is_literal() {
        let network = Network::new(
            1,
            "example.com".to_string(),
            "/network/".to_string(),
            InstallMode::Subdirectory,
            1,
        );
        assert_eq!(like(plan("network", &network)), "network");
        assert_eq!(like(plan("docs", &network)), "/network/docs/");
    }

    #[test]
    fn test_unsorted_page_two_query() {
        let network = subdomain_network();
        let query = SiteQuery::new(
            &network,
            SiteFilter::All,
            SortSpec::unsorted(),
            PageWindow::new(2, 20),
        );

        assert!(query.filter.is_unfiltered());
        assert_eq!(query.order, None);
        assert_eq!(query.window.offset(), 20);
        assert_eq!(query.window.limit(), 20);
    }

    #[test]
    fn test_unsorted_ignores_requested_direction() {
        let network = subdomain_network();
        let sort = SortSpec::from_request(None, Some("desc"));
        let query = SiteQuery::new(&network, SiteFilter::All, sort, PageWindow::new(1, 20));

        assert_eq!(query.order, None);
    }

    #[test]
    fn test_count_query_shares_filter() {
        let network = subdomain_network();
        let filter = SiteFilter::IdIn(vec![3, 5]);
        let query = SiteQuery::new(
            &network,
            filter.clone(),
            SortSpec::new(SortColumn::Registered, SortDirection::Desc),
            PageWindow::new(3, 10),
        );

        let count = query.count_query();
        assert_eq!(count.filter, filter);
        assert_eq!(count.network_id, 1);
    }
}
