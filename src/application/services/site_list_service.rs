//! Network sites listing service.
//!
//! One request runs one flow: gate, classify, plan, (resolve addresses),
//! build, count (exact mode only, always first), list, derive rows.

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::application::services::confirmation::ConfirmationIssuer;
use crate::domain::entities::{Network, Site, SiteUser};
use crate::domain::listing::{
    ActionKey, Badge, BulkAction, CountStrategy, DisplayMode, FilterPlan, PageWindow,
    PaginationPolicy, RowAction, RowActionExtension, RowContext, RowState, SearchKind,
    SearchQuery, SiteFilter, SiteQuery, SortSpec, USERS_SHOWN, bulk_actions, plan_filter,
};
use crate::domain::permissions::Permissions;
use crate::domain::repositories::{DatasetSizePolicy, SiteRepository};
use crate::error::AppError;

/// Request-scoped listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub mode: DisplayMode,
    /// Raw `s` parameter.
    pub search: String,
    pub orderby: Option<String>,
    pub order: Option<String>,
    pub paged: i64,
    /// Overrides the configured page size.
    pub per_page: Option<i64>,
    /// The viewer's own active site; defaults to the network's main site.
    pub current_site_id: Option<i64>,
}

/// One row of the listing with everything needed to render it.
#[derive(Debug, Clone, Serialize)]
pub struct ListedSite {
    #[serde(flatten)]
    pub site: Site,
    pub name: String,
    pub home_url: String,
    pub badges: Vec<Badge>,
    pub row_class: Option<&'static str>,
    pub actions: Vec<RowAction>,
    pub selectable: bool,
    pub users: Vec<SiteUser>,
    /// More members exist than are listed in `users`.
    pub more_users: bool,
}

/// Search as the listing understood it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    pub term: String,
    pub wildcard: bool,
    pub kind: SearchKind,
}

/// A rendered page of the listing.
#[derive(Debug, Clone, Serialize)]
pub struct SiteListPage {
    pub items: Vec<ListedSite>,
    pub total_items: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub large_dataset: bool,
    pub mode: DisplayMode,
    pub search: SearchSummary,
    pub sort: SortSpec,
    pub bulk_actions: Vec<BulkAction>,
}

pub struct SiteListService {
    sites: Arc<dyn SiteRepository>,
    dataset_size: Arc<dyn DatasetSizePolicy>,
    confirmations: Arc<dyn ConfirmationIssuer>,
    network: Arc<Network>,
    default_per_page: i64,
    extensions: Vec<Arc<dyn RowActionExtension>>,
}

impl SiteListService {
    pub fn new(
        sites: Arc<dyn SiteRepository>,
        dataset_size: Arc<dyn DatasetSizePolicy>,
        confirmations: Arc<dyn ConfirmationIssuer>,
        network: Arc<Network>,
        default_per_page: i64,
    ) -> Self {
        Self {
            sites,
            dataset_size,
            confirmations,
            network,
            default_per_page,
            extensions: Vec::new(),
        }
    }

    /// Registers a hook run on every row's action list, in registration order.
    pub fn with_extension(mut self, extension: Arc<dyn RowActionExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Builds one page of the listing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the viewer may not manage sites;
    /// nothing is queried in that case.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn prepare(
        &self,
        request: &ListRequest,
        viewer: &dyn Permissions,
    ) -> Result<SiteListPage, AppError> {
        if !viewer.can_manage_sites() {
            return Err(AppError::forbidden(
                "Sorry, you are not allowed to access this page.",
                json!({ "capability": "manage_sites" }),
            ));
        }

        let network = self.network.as_ref();
        let policy = PaginationPolicy::new(self.dataset_size.is_large_dataset(network.id).await?);

        let search = SearchQuery::parse(&request.search, network.install_mode);
        let sort = policy.effective_sort(
            &search,
            request.orderby.as_deref(),
            request.order.as_deref(),
        );

        let filter = match plan_filter(&search, network) {
            FilterPlan::Ready(filter) => filter,
            FilterPlan::ResolveIps(pattern) => {
                let ids = self.sites.match_ips(&pattern).await?;
                tracing::debug!(matches = ids.len(), "Resolved registration IPs");
                SiteFilter::from_ip_matches(ids)
            }
        };

        let window = PageWindow::new(
            request.paged,
            request.per_page.unwrap_or(self.default_per_page),
        );
        let query = SiteQuery::new(network, filter, sort, window);

        let strategy = policy.count_strategy();
        let exact = match strategy {
            CountStrategy::Exact => Some(self.sites.count(&query.count_query()).await?),
            CountStrategy::PageRows => None,
        };

        let sites = self.sites.list(&query).await?;
        let total_items = policy.total_items(exact, sites.len());

        tracing::debug!(
            search_kind = ?search.kind(),
            count_strategy = ?strategy,
            rows = sites.len(),
            total_items,
            "Prepared sites listing"
        );

        let ctx = RowContext {
            network,
            current_site_id: request.current_site_id.unwrap_or(network.main_site_id),
            permissions: viewer,
        };

        let mut items = Vec::with_capacity(sites.len());
        for site in sites {
            items.push(self.listed_site(site, &ctx).await?);
        }

        Ok(SiteListPage {
            items,
            total_items,
            per_page: window.per_page(),
            current_page: window.page(),
            total_pages: window.total_pages(total_items),
            large_dataset: policy.is_large_dataset(),
            mode: request.mode,
            search: SearchSummary {
                term: search.term().to_string(),
                wildcard: search.wildcard(),
                kind: search.kind(),
            },
            sort,
            bulk_actions: bulk_actions(viewer),
        })
    }

    async fn listed_site(&self, site: Site, ctx: &RowContext<'_>) -> Result<ListedSite, AppError> {
        let network = self.network.as_ref();
        let name = network.display_name(&site);
        let state = RowState::derive(&site, ctx);
        let row_class = state.row_class();

        let mut actions = state.actions;
        for action in &mut actions {
            self.attach_link(action, &site, &name);
        }
        for extension in &self.extensions {
            extension.extend(&mut actions, &site, &name);
        }

        let mut users = self
            .sites
            .users_for_site(site.id, USERS_SHOWN as i64 + 1)
            .await?;
        let more_users = users.len() > USERS_SHOWN;
        users.truncate(USERS_SHOWN);

        Ok(ListedSite {
            home_url: network.home_url(&site),
            name,
            badges: state.badges,
            row_class,
            actions,
            selectable: state.selectable,
            users,
            more_users,
            site,
        })
    }

    /// Fills in the target of an enabled action. State transitions point at
    /// the confirmation screen and carry a token bound to the site.
    fn attach_link(&self, action: &mut RowAction, site: &Site, name: &str) {
        if !action.enabled {
            return;
        }

        action.url = match &action.key {
            ActionKey::Edit => Some(format!("/network/site-info?id={}", site.id)),
            ActionKey::Backend => Some(self.network.dashboard_url(site)),
            ActionKey::Visit => Some(self.network.home_url(site)),
            ActionKey::Custom(_) => None,
            key => {
                let (Some(verb), Some(message)) = (key.transition(), key.confirm_message(name))
                else {
                    return;
                };
                let token = self.confirmations.issue(verb, site.id);
                let url = confirm_url(verb, site.id, &message, &token);
                action.confirmation = Some(token);
                Some(url)
            }
        };
    }
}

pub fn confirm_url(verb: &str, site_id: i64, message: &str, token: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("action2", verb)
        .append_pair("id", &site_id.to_string())
        .append_pair("msg", message)
        .append_pair("_confirm", token)
        .finish();
    format!("/network/sites/confirm?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::confirmation::MockConfirmationIssuer;
    use crate::domain::entities::InstallMode;
    use crate::domain::listing::{SortColumn, SortDirection, SortField};
    use crate::domain::permissions::{Capability, Viewer};
    use crate::domain::repositories::{MockDatasetSizePolicy, MockSiteRepository};
    use mockall::Sequence;

    fn network() -> Arc<Network> {
        Arc::new(Network::new(
            1,
            "example.com".to_string(),
            "/".to_string(),
            InstallMode::Subdomain,
            1,
        ))
    }

    fn admin() -> Viewer {
        Viewer::new(1, "admin".to_string(), Capability::ALL, 1)
    }

    fn site(id: i64) -> Site {
        Site::new(id, 1, format!("s{id}.example.com"), "/".to_string())
    }

    fn dataset(large: bool) -> MockDatasetSizePolicy {
        let mut policy = MockDatasetSizePolicy::new();
        policy.expect_is_large_dataset().returning(move |_| Ok(large));
        policy
    }

    fn issuer() -> MockConfirmationIssuer {
        let mut issuer = MockConfirmationIssuer::new();
        issuer
            .expect_issue()
            .returning(|verb, id| format!("{verb}-{id}"));
        issuer
    }

    fn service(repo: MockSiteRepository, large: bool) -> SiteListService {
        SiteListService::new(
            Arc::new(repo),
            Arc::new(dataset(large)),
            Arc::new(issuer()),
            network(),
            20,
        )
    }

    fn no_users(repo: &mut MockSiteRepository) {
        repo.expect_users_for_site().returning(|_, _| Ok(vec![]));
    }

    #[tokio::test]
    async fn test_forbidden_without_manage_capability() {
        let repo = MockSiteRepository::new();
        let viewer = Viewer::new(2, "guest".to_string(), Vec::<Capability>::new(), 1);

        let result = service(repo, false)
            .prepare(&ListRequest::default(), &viewer)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_exact_count_runs_before_listing() {
        let mut repo = MockSiteRepository::new();
        let mut seq = Sequence::new();

        repo.expect_count()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(57));
        repo.expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![site(2), site(3)]));
        no_users(&mut repo);

        let page = service(repo, false)
            .prepare(&ListRequest::default(), &admin())
            .await
            .unwrap();

        assert_eq!(page.total_items, 57);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.per_page, 20);
    }

    #[tokio::test]
    async fn test_large_dataset_skips_count_and_reports_page_rows() {
        let mut repo = MockSiteRepository::new();

        repo.expect_count().never();
        repo.expect_list()
            .withf(|q| q.order == Some((SortField::Id, SortDirection::Desc)))
            .times(1)
            .returning(|q| Ok((1..=q.window.limit()).map(site).collect()));
        no_users(&mut repo);

        let page = service(repo, true)
            .prepare(&ListRequest::default(), &admin())
            .await
            .unwrap();

        assert!(page.large_dataset);
        assert_eq!(page.total_items, 20);
        assert_eq!(page.sort, SortSpec::new(SortColumn::BlogId, SortDirection::Desc));
    }

    #[tokio::test]
    async fn test_zero_ip_matches_yields_empty_listing() {
        let mut repo = MockSiteRepository::new();

        repo.expect_match_ips()
            .withf(|p| p.to_like() == "10.0.0.1")
            .times(1)
            .returning(|_| Ok(vec![]));
        repo.expect_count()
            .withf(|q| q.filter == SiteFilter::IdIn(vec![0]))
            .returning(|_| Ok(0));
        repo.expect_list()
            .withf(|q| q.filter == SiteFilter::IdIn(vec![0]))
            .returning(|_| Ok(vec![]));

        let request = ListRequest {
            search: "10.0.0.1".to_string(),
            ..ListRequest::default()
        };
        let page = service(repo, false).prepare(&request, &admin()).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.search.kind, SearchKind::Ipv4);
    }

    #[tokio::test]
    async fn test_page_and_per_page_shape_the_window() {
        let mut repo = MockSiteRepository::new();

        repo.expect_count().returning(|_| Ok(0));
        repo.expect_list()
            .withf(|q| q.window.offset() == 100 && q.window.limit() == 50 && q.order.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));

        let request = ListRequest {
            paged: 3,
            per_page: Some(50),
            ..ListRequest::default()
        };
        service(repo, false).prepare(&request, &admin()).await.unwrap();
    }

    #[tokio::test]
    async fn test_transitions_link_to_confirmation() {
        let mut repo = MockSiteRepository::new();
        repo.expect_count().returning(|_| Ok(1));
        repo.expect_list().returning(|_| Ok(vec![site(4)]));
        no_users(&mut repo);

        let page = service(repo, false)
            .prepare(&ListRequest::default(), &admin())
            .await
            .unwrap();
        let row = &page.items[0];

        let archive = row
            .actions
            .iter()
            .find(|a| a.key == ActionKey::Archive)
            .unwrap();
        assert!(archive.is_callable());
        assert_eq!(archive.confirmation.as_deref(), Some("archiveblog-4"));
        let url = archive.url.as_deref().unwrap();
        assert!(url.starts_with("/network/sites/confirm?action2=archiveblog&id=4&msg="));
        assert!(url.ends_with("&_confirm=archiveblog-4"));

        let unarchive = row
            .actions
            .iter()
            .find(|a| a.key == ActionKey::Unarchive)
            .unwrap();
        assert!(unarchive.url.is_none());
        assert!(unarchive.confirmation.is_none());

        assert_eq!(row.name, "s4");
        assert_eq!(row.home_url, "https://s4.example.com/");
    }

    #[tokio::test]
    async fn test_users_column_caps_at_five() {
        let mut repo = MockSiteRepository::new();
        repo.expect_count().returning(|_| Ok(1));
        repo.expect_list().returning(|_| Ok(vec![site(4)]));
        repo.expect_users_for_site()
            .withf(|id, limit| *id == 4 && *limit == 6)
            .returning(|_, limit| {
                Ok((1..=limit)
                    .map(|i| SiteUser {
                        id: i,
                        login: format!("user{i}"),
                        email: format!("user{i}@example.com"),
                    })
                    .collect())
            });

        let page = service(repo, false)
            .prepare(&ListRequest::default(), &admin())
            .await
            .unwrap();

        assert_eq!(page.items[0].users.len(), 5);
        assert!(page.items[0].more_users);
    }

    #[tokio::test]
    async fn test_extension_can_append_actions() {
        let mut repo = MockSiteRepository::new();
        repo.expect_count().returning(|_| Ok(1));
        repo.expect_list().returning(|_| Ok(vec![site(4)]));
        no_users(&mut repo);

        let extension = |actions: &mut Vec<RowAction>, site: &Site, _: &str| {
            let mut backup = RowAction::new(ActionKey::Custom("backup".to_string()), true);
            backup.url = Some(format!("/backups?site={}", site.id));
            actions.push(backup);
        };
        let service = service(repo, false).with_extension(Arc::new(extension));

        let page = service
            .prepare(&ListRequest::default(), &admin())
            .await
            .unwrap();
        let last = page.items[0].actions.last().unwrap();

        assert_eq!(last.key.as_str(), "backup");
        assert_eq!(last.url.as_deref(), Some("/backups?site=4"));
    }

    #[test]
    fn test_confirm_url_encodes_message() {
        let url = confirm_url("spamblog", 9, "You are about to mark the site a&b as spam.", "t");
        assert_eq!(
            url,
            "/network/sites/confirm?action2=spamblog&id=9&msg=You+are+about+to+mark+the+site+a%26b+as+spam.&_confirm=t"
        );
    }
}
