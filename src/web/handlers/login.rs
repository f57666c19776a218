//! Login and logout for the network admin pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::state::AppState;
use crate::web::middleware::web_auth::{AUTH_COOKIE, LOGIN_PATH};

const AFTER_LOGIN: &str = "/network/sites";

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub token: String,
}

/// `GET /network/login`
pub async fn login_handler() -> impl IntoResponse {
    LoginTemplate { error: None }
}

/// `POST /network/login`
///
/// Verifies the submitted API token and stores it in the `auth_token`
/// cookie. An invalid token re-renders the form with 401.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = form.token.trim();

    match state.auth_service.authenticate(token).await {
        Ok(viewer) => {
            tracing::info!(token_id = viewer.token_id, "Admin signed in");
            let cookie = format!("{AUTH_COOKIE}={token}; Path=/network; HttpOnly; SameSite=Strict");
            ([(SET_COOKIE, cookie)], Redirect::to(AFTER_LOGIN)).into_response()
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            LoginTemplate {
                error: Some("Invalid or revoked token."),
            },
        )
            .into_response(),
    }
}

/// `GET /network/logout`
pub async fn logout_handler() -> impl IntoResponse {
    let cookie = format!("{AUTH_COOKIE}=; Path=/network; HttpOnly; SameSite=Strict; Max-Age=0");
    ([(SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH))
}
