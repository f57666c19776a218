//! Handler for the JSON sites listing.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use validator::Validate;

use crate::api::dto::sites::SiteListParams;
use crate::application::services::SiteListPage;
use crate::domain::permissions::Viewer;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the network's sites.
///
/// # Endpoint
///
/// `GET /api/sites`
///
/// # Query Parameters
///
/// - `s` (optional): Search term; a numeric id, an IPv4 prefix, or a domain/path fragment.
///   `*` turns on prefix matching.
/// - `orderby` (optional): `registered`, `lastupdated`, `blogname` or `blog_id`
/// - `order` (optional): `asc` or `desc`
/// - `paged` (optional): Page number (default: 1)
/// - `per_page` (optional): Items per page, 1..=999
/// - `mode` (optional): `list` or `excerpt`
///
/// # Response
///
/// `{ items, total_items, per_page, current_page, ... }`; every item carries
/// its `badges` and ordered `actions`. On large networks `total_items` is the
/// number of rows on this page.
///
/// # Errors
///
/// Returns 400 Bad Request if `per_page` is out of range.
/// Returns 403 Forbidden if the token lacks `manage_sites`.
pub async fn site_list_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(params): Query<SiteListParams>,
) -> Result<Json<SiteListPage>, AppError> {
    params.validate()?;

    let page = state
        .site_list_service
        .prepare(&params.to_request(), &viewer)
        .await?;

    Ok(Json(page))
}
