//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::site_list_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET /sites` - Paginated, searchable sites listing
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/sites", get(site_list_handler))
}
