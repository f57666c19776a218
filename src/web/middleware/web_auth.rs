//! Cookie authentication for the network admin pages.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;

/// Name of the cookie carrying the API token.
pub const AUTH_COOKIE: &str = "auth_token";

pub const LOGIN_PATH: &str = "/network/login";

/// Returns the value of the `auth_token` cookie, if present.
pub fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == AUTH_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

/// Resolves the viewer from the `auth_token` cookie and stores it in the
/// request extensions.
///
/// Unlike the API middleware this redirects to the login page instead of
/// answering 401.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let Some(token) = token_from_cookies(req.headers()) else {
        return Err(Redirect::to(LOGIN_PATH));
    };

    match st.auth_service.authenticate(&token).await {
        Ok(viewer) => {
            req.extensions_mut().insert(viewer);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Web session rejected");
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}
