//! Top-level router combining API and page routes.
//!
//! # Route Structure
//!
//! - `GET  /health`          - Health check (public)
//! - `GET  /api/sites`       - Sites listing as JSON (Bearer token required)
//! - `/network/sites`        - Sites listing page (cookie session required)
//! - `/network/login`        - Sign-in page (public)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token (API) or cookie session (pages)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes.
///
/// `rate_limit` is `None` to serve without limits, otherwise
/// `Some(behind_proxy)`: when `true` the client IP is read from forwarding
/// headers instead of the peer socket address.
pub fn router(state: AppState, rate_limit: Option<bool>) -> Router {
    let limit = |router: Router<AppState>, quota| match rate_limit {
        Some(behind_proxy) => rate_limit::limit(router, quota, behind_proxy),
        None => router,
    };

    let api_router = limit(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        rate_limit::SECURE,
    );

    let web_protected = limit(
        web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        )),
        rate_limit::SECURE,
    );

    let web_public = limit(web::routes::public_routes(), rate_limit::PUBLIC);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest("/network", Router::new().merge(web_protected).merge(web_public))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the production router: rate limited, trailing slashes trimmed.
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, Some(behind_proxy)))
}
