//! PostgreSQL implementation of the network repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{InstallMode, Network};
use crate::domain::repositories::NetworkRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct NetworkRow {
    id: i64,
    domain: String,
    path: String,
    install_mode: String,
    main_site_id: i64,
}

pub fn parse_install_mode(raw: &str) -> Result<InstallMode, AppError> {
    match raw {
        "subdomain" => Ok(InstallMode::Subdomain),
        "subdirectory" => Ok(InstallMode::Subdirectory),
        other => Err(AppError::internal(
            "Unknown install mode",
            json!({ "install_mode": other }),
        )),
    }
}

pub struct PgNetworkRepository {
    pool: Arc<PgPool>,
}

impl PgNetworkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NetworkRepository for PgNetworkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Network>, AppError> {
        let row = sqlx::query_as::<_, NetworkRow>(
            r#"
            SELECT id, domain, path, install_mode, COALESCE(main_site_id, 0) AS main_site_id
            FROM networks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| {
            Ok(Network::new(
                r.id,
                r.domain,
                r.path,
                parse_install_mode(&r.install_mode)?,
                r.main_site_id,
            ))
        })
        .transpose()
    }
}
