//! Network sites page: renders the listing as an HTML table.
//!
//! Each [`Column`] renders through its own cell template; the page template
//! only lays out headers, rows and the pager.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Query, State},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::sites::SiteListParams;
use crate::application::services::{ListedSite, SiteListPage};
use crate::domain::entities::{InstallMode, SiteUser};
use crate::domain::listing::columns::{format_last_updated, format_registered};
use crate::domain::listing::{
    Badge, BulkAction, Column, DisplayMode, RowAction, SortDirection, USERS_SHOWN,
};
use crate::domain::permissions::Viewer;
use crate::error::AppError;
use crate::state::AppState;

const SITES_PATH: &str = "/network/sites";
const EMPTY_MESSAGE: &str = "No sites found.";

#[derive(Template)]
#[template(path = "cells/checkbox.html")]
struct CheckboxCell<'a> {
    site_id: i64,
    name: &'a str,
}

#[derive(Template)]
#[template(path = "cells/name.html")]
struct NameCell<'a> {
    name: &'a str,
    edit_url: Option<&'a str>,
    badges: &'a [Badge],
    title: Option<&'a str>,
    tagline: Option<&'a str>,
    excerpt: bool,
    actions: Vec<&'a RowAction>,
}

#[derive(Template)]
#[template(path = "cells/text.html")]
struct TextCell {
    text: String,
}

#[derive(Template)]
#[template(path = "cells/users.html")]
struct UsersCell<'a> {
    users: &'a [SiteUser],
    excerpt: bool,
    more_url: Option<String>,
    shown: usize,
}

/// A column header.
pub struct HeaderView {
    pub key: &'static str,
    pub label: &'static str,
    pub sort_url: Option<String>,
    /// `asc` or `desc` when the listing is ordered by this column.
    pub sorted: Option<&'static str>,
}

/// A table row with pre-rendered cells.
pub struct RowView {
    pub site_id: i64,
    pub class: &'static str,
    pub cells: Vec<String>,
}

pub struct PagerView {
    pub current: i64,
    pub total_pages: i64,
    pub first_url: Option<String>,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub last_url: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "sites.html")]
pub struct SitesTemplate {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub search: String,
    pub mode: DisplayMode,
    pub list_mode_url: String,
    pub excerpt_mode_url: String,
    pub total_items: i64,
    pub pager: PagerView,
    pub bulk_actions: Vec<BulkAction>,
    pub empty_message: &'static str,
}

/// Query parameters carried over by header, mode and pager links.
struct LinkBase<'a> {
    s: &'a str,
    mode: DisplayMode,
    orderby: Option<&'a str>,
    order: Option<&'a str>,
    per_page: Option<i64>,
}

impl LinkBase<'_> {
    fn url(&self, paged: i64) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if !self.s.is_empty() {
            query.append_pair("s", self.s);
        }
        if self.mode == DisplayMode::Excerpt {
            query.append_pair("mode", self.mode.as_str());
        }
        if let Some(orderby) = self.orderby {
            query.append_pair("orderby", orderby);
        }
        if let Some(order) = self.order {
            query.append_pair("order", order);
        }
        if let Some(per_page) = self.per_page {
            query.append_pair("per_page", &per_page.to_string());
        }
        if paged > 1 {
            query.append_pair("paged", &paged.to_string());
        }

        let query = query.finish();
        if query.is_empty() {
            SITES_PATH.to_string()
        } else {
            format!("{SITES_PATH}?{query}")
        }
    }
}

fn direction_param(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    }
}

fn header_view(
    column: Column,
    page: &SiteListPage,
    base: &LinkBase<'_>,
    mode: InstallMode,
) -> HeaderView {
    let Some(sort_column) = column.sort_column() else {
        return HeaderView {
            key: column.key(),
            label: column.header(mode),
            sort_url: None,
            sorted: None,
        };
    };

    let is_current = page.sort.column == Some(sort_column);
    let next = if is_current {
        page.sort.direction.reversed()
    } else {
        SortDirection::Asc
    };

    let link = LinkBase {
        orderby: Some(sort_column.as_str()),
        order: Some(direction_param(next)),
        ..*base
    };

    HeaderView {
        key: column.key(),
        label: column.header(mode),
        sort_url: Some(link.url(1)),
        sorted: is_current.then(|| direction_param(page.sort.direction)),
    }
}

/// Renders one cell. Every column has exactly one case.
fn render_cell(
    column: Column,
    item: &ListedSite,
    mode: DisplayMode,
) -> Result<String, askama::Error> {
    let excerpt = mode == DisplayMode::Excerpt;

    match column {
        Column::Checkbox => {
            if item.selectable {
                CheckboxCell {
                    site_id: item.site.id,
                    name: &item.name,
                }
                .render()
            } else {
                Ok(String::new())
            }
        }
        Column::BlogName => NameCell {
            name: &item.name,
            edit_url: item
                .actions
                .iter()
                .find(|a| a.key.as_str() == "edit")
                .and_then(|a| a.url.as_deref()),
            badges: &item.badges,
            title: item.site.title.as_deref(),
            tagline: item.site.tagline.as_deref(),
            excerpt,
            actions: item.actions.iter().filter(|a| a.enabled).collect(),
        }
        .render(),
        Column::LastUpdated => TextCell {
            text: format_last_updated(item.site.last_updated, mode),
        }
        .render(),
        Column::Registered => TextCell {
            text: format_registered(item.site.registered, mode),
        }
        .render(),
        Column::Users => UsersCell {
            users: &item.users,
            excerpt,
            more_url: item
                .more_users
                .then(|| format!("/network/site-users?id={}", item.site.id)),
            shown: USERS_SHOWN,
        }
        .render(),
    }
}

fn render_error(e: askama::Error) -> AppError {
    tracing::error!(error = %e, "Template rendering failed");
    AppError::internal("Template rendering failed", json!({}))
}

/// Maps a prepared listing page to the page template.
pub fn sites_template(
    page: &SiteListPage,
    params: &SiteListParams,
    install_mode: InstallMode,
) -> Result<SitesTemplate, AppError> {
    let base = LinkBase {
        s: params.s.as_deref().unwrap_or_default(),
        mode: page.mode,
        orderby: params.orderby.as_deref().filter(|v| !v.is_empty()),
        order: params.order.as_deref().filter(|v| !v.is_empty()),
        per_page: params.per_page,
    };

    let headers = Column::ALL
        .iter()
        .map(|column| header_view(*column, page, &base, install_mode))
        .collect();

    let rows = page
        .items
        .iter()
        .map(|item| {
            let cells = Column::ALL
                .iter()
                .map(|column| render_cell(*column, item, page.mode))
                .collect::<Result<Vec<_>, _>>()
                .map_err(render_error)?;
            Ok(RowView {
                site_id: item.site.id,
                class: item.row_class.unwrap_or_default(),
                cells,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let current = page.current_page;
    let total_pages = page.total_pages;
    let pager = PagerView {
        current,
        total_pages,
        first_url: (current > 2).then(|| base.url(1)),
        prev_url: (current > 1).then(|| base.url(current - 1)),
        next_url: (current < total_pages).then(|| base.url(current + 1)),
        last_url: (current + 1 < total_pages).then(|| base.url(total_pages)),
    };

    Ok(SitesTemplate {
        headers,
        rows,
        search: base.s.to_string(),
        mode: page.mode,
        list_mode_url: LinkBase {
            mode: DisplayMode::List,
            ..base
        }
        .url(current),
        excerpt_mode_url: LinkBase {
            mode: DisplayMode::Excerpt,
            ..base
        }
        .url(current),
        total_items: page.total_items,
        pager,
        bulk_actions: page.bulk_actions.clone(),
        empty_message: EMPTY_MESSAGE,
    })
}

/// Renders the network sites page.
///
/// # Endpoint
///
/// `GET /network/sites`
///
/// Accepts the same query parameters as `GET /api/sites`.
///
/// # Errors
///
/// Returns 403 Forbidden if the viewer lacks `manage_sites`; no partial page
/// is rendered.
pub async fn sites_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(params): Query<SiteListParams>,
) -> Result<SitesTemplate, AppError> {
    params.validate()?;

    let page = state
        .site_list_service
        .prepare(&params.to_request(), &viewer)
        .await?;

    sites_template(&page, &params, state.network.install_mode)
}
