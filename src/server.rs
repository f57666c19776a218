//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, network lookup, service wiring and
//! the Axum server lifecycle.

use crate::application::services::{AuthService, HmacConfirmationIssuer, SiteListService};
use crate::config::Config;
use crate::domain::repositories::{NetworkRepository, SiteRepository};
use crate::infrastructure::persistence::{
    PgNetworkRepository, PgSiteRepository, PgTokenRepository, SiteCountPolicy,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The configured network does not exist
/// - Server bind fails or a runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);

    let network = PgNetworkRepository::new(pool.clone())
        .find_by_id(config.network_id)
        .await?
        .with_context(|| {
            format!(
                "Network {} not found; create it with `admin network create`",
                config.network_id
            )
        })?;
    tracing::info!(
        network_id = network.id,
        domain = %network.domain,
        install_mode = ?network.install_mode,
        main_site_id = network.main_site_id,
        "Network loaded"
    );
    let network = Arc::new(network);

    let sites: Arc<dyn SiteRepository> = Arc::new(PgSiteRepository::new(pool.clone()));
    let dataset_size = Arc::new(SiteCountPolicy::new(
        sites.clone(),
        config.large_network_threshold,
    ));
    let confirmations = Arc::new(HmacConfirmationIssuer::new(
        config.token_signing_secret.clone(),
    ));

    let site_list_service = Arc::new(SiteListService::new(
        sites.clone(),
        dataset_size,
        confirmations,
        network.clone(),
        config.sites_per_page,
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(PgTokenRepository::new(pool.clone())),
        config.token_signing_secret.clone(),
        network.main_site_id,
    ));

    let state = AppState {
        site_list_service,
        auth_service,
        sites,
        network,
    };

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down");
}
