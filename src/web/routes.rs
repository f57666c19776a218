//! Routes of the network admin pages, nested under `/network`.

use crate::state::AppState;
use crate::web::handlers::{login_handler, login_submit_handler, logout_handler, sites_handler};
use axum::{Router, routing::get};

/// Pages requiring a signed-in admin.
///
/// - `GET /sites` - network sites listing
/// - `GET /logout`
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/sites", get(sites_handler))
        .route("/logout", get(logout_handler))
}

/// - `GET /login`, `POST /login`
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", get(login_handler).post(login_submit_handler))
}
