#![allow(dead_code)]

use network_sites::application::services::auth_service::hash_token;
use network_sites::application::services::{AuthService, HmacConfirmationIssuer, SiteListService};
use network_sites::domain::entities::Network;
use network_sites::domain::permissions::Capability;
use network_sites::domain::repositories::{NetworkRepository, SiteRepository, TokenRepository};
use network_sites::infrastructure::persistence::{
    PgNetworkRepository, PgSiteRepository, PgTokenRepository, SiteCountPolicy,
};
use network_sites::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

pub const SIGNING_SECRET: &str = "test-signing-secret";

/// Inserts a network on `example.com` with its main site and loads it back.
pub async fn seed_network(pool: &PgPool, install_mode: &str) -> Network {
    let network_id: i64 = sqlx::query_scalar(
        "INSERT INTO networks (domain, path, install_mode) VALUES ('example.com', '/', $1) RETURNING id",
    )
    .bind(install_mode)
    .fetch_one(pool)
    .await
    .unwrap();

    let main_site_id = create_site(pool, network_id, "example.com", "/").await;

    sqlx::query("UPDATE networks SET main_site_id = $1 WHERE id = $2")
        .bind(main_site_id)
        .bind(network_id)
        .execute(pool)
        .await
        .unwrap();

    PgNetworkRepository::new(Arc::new(pool.clone()))
        .find_by_id(network_id)
        .await
        .unwrap()
        .unwrap()
}

pub async fn create_site(pool: &PgPool, network_id: i64, domain: &str, path: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO sites (network_id, domain, path, registered, last_updated) \
         VALUES ($1, $2, $3, NOW(), NOW()) RETURNING id",
    )
    .bind(network_id)
    .bind(domain)
    .bind(path)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn archive_site(pool: &PgPool, site_id: i64) {
    sqlx::query("UPDATE sites SET archived = TRUE WHERE id = $1")
        .bind(site_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn deactivate_site(pool: &PgPool, site_id: i64) {
    sqlx::query("UPDATE sites SET deleted = TRUE WHERE id = $1")
        .bind(site_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn log_registration(pool: &PgPool, site_id: i64, ip: &str) {
    sqlx::query("INSERT INTO registration_log (site_id, email, ip) VALUES ($1, 'owner@example.com', $2)")
        .bind(site_id)
        .bind(ip)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn add_user(pool: &PgPool, site_id: i64, login: &str) -> i64 {
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (login, email) VALUES ($1, $2) \
         ON CONFLICT (login) DO UPDATE SET login = EXCLUDED.login RETURNING id",
    )
    .bind(login)
    .bind(format!("{login}@example.com"))
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO site_users (site_id, user_id) VALUES ($1, $2)")
        .bind(site_id)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();

    user_id
}

/// Stores a token with `capabilities` and returns its raw value.
pub async fn create_token(pool: &PgPool, name: &str, capabilities: &[Capability]) -> String {
    let raw = format!("raw-{name}");
    PgTokenRepository::new(Arc::new(pool.clone()))
        .create_token(name, &hash_token(SIGNING_SECRET, &raw), capabilities)
        .await
        .unwrap();
    raw
}

pub async fn admin_token(pool: &PgPool) -> String {
    create_token(pool, "admin", &[Capability::ManageSites, Capability::DeleteSites]).await
}

/// Application state over `pool`. Networks above `large_network_threshold`
/// sites skip the exact count.
pub fn create_test_state(pool: PgPool, network: Network, large_network_threshold: i64) -> AppState {
    let pool = Arc::new(pool);
    let network = Arc::new(network);

    let sites: Arc<dyn SiteRepository> = Arc::new(PgSiteRepository::new(pool.clone()));
    let site_list_service = Arc::new(SiteListService::new(
        sites.clone(),
        Arc::new(SiteCountPolicy::new(sites.clone(), large_network_threshold)),
        Arc::new(HmacConfirmationIssuer::new(SIGNING_SECRET.to_string())),
        network.clone(),
        20,
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(PgTokenRepository::new(pool)),
        SIGNING_SECRET.to_string(),
        network.main_site_id,
    ));

    AppState {
        site_list_service,
        auth_service,
        sites,
        network,
    }
}
