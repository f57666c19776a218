//! PostgreSQL implementation of the site repository.
//!
//! Listing and count statements are assembled with [`QueryBuilder`]: every
//! user-derived value goes through `push_bind`, and only fixed column names
//! and directions from closed enums are pushed as SQL text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Site, SiteUser};
use crate::domain::listing::{LikePattern, SiteCountQuery, SiteFilter, SiteQuery};
use crate::domain::repositories::SiteRepository;
use crate::error::AppError;

const SITE_COLUMNS: &str = "id, network_id, domain, path, registered, last_updated, \
                            archived, spam, deleted, mature, title, tagline";

#[derive(FromRow)]
struct SiteRow {
    id: i64,
    network_id: i64,
    domain: String,
    path: String,
    registered: Option<DateTime<Utc>>,
    last_updated: Option<DateTime<Utc>>,
    archived: bool,
    spam: bool,
    deleted: bool,
    mature: bool,
    title: Option<String>,
    tagline: Option<String>,
}

impl From<SiteRow> for Site {
    fn from(row: SiteRow) -> Self {
        Site {
            id: row.id,
            network_id: row.network_id,
            domain: row.domain,
            path: row.path,
            registered: row.registered,
            last_updated: row.last_updated,
            archived: row.archived,
            spam: row.spam,
            deleted: row.deleted,
            mature: row.mature,
            title: row.title,
            tagline: row.tagline,
        }
    }
}

#[derive(FromRow)]
struct SiteUserRow {
    id: i64,
    login: String,
    email: String,
}

/// PostgreSQL repository for the `sites`, `registration_log` and
/// `site_users` tables.
pub struct PgSiteRepository {
    pool: Arc<PgPool>,
}

impl PgSiteRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn push_scope(qb: &mut QueryBuilder<'static, Postgres>, network_id: i64, filter: &SiteFilter) {
    qb.push(" WHERE network_id = ").push_bind(network_id);

    match filter {
        SiteFilter::All => {}
        SiteFilter::IdEquals(id) => {
            qb.push(" AND id = ").push_bind(*id);
        }
        SiteFilter::IdIn(ids) => {
            qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
        SiteFilter::DomainLike(pattern) => {
            qb.push(" AND domain ILIKE ")
                .push_bind(pattern.to_like())
                .push(r" ESCAPE '\'");
        }
        SiteFilter::PathLike(pattern) => {
            qb.push(" AND path ILIKE ")
                .push_bind(pattern.to_like())
                .push(r" ESCAPE '\'");
        }
    }
}

/// `SELECT ... WHERE ... [ORDER BY ...] LIMIT ... OFFSET ...`
pub fn build_list_query(query: &SiteQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {SITE_COLUMNS} FROM sites"));
    push_scope(&mut qb, query.network_id, &query.filter);

    if let Some((field, direction)) = query.order {
        qb.push(" ORDER BY ")
            .push(field.column_name())
            .push(" ")
            .push(direction.as_sql());
    }

    qb.push(" LIMIT ")
        .push_bind(query.window.limit())
        .push(" OFFSET ")
        .push_bind(query.window.offset());
    qb
}

/// `SELECT COUNT(id) ... WHERE ...` with the listing's predicate.
pub fn build_count_query(query: &SiteCountQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(id) FROM sites");
    push_scope(&mut qb, query.network_id, &query.filter);
    qb
}

#[async_trait]
impl SiteRepository for PgSiteRepository {
    async fn list(&self, query: &SiteQuery) -> Result<Vec<Site>, AppError> {
        let mut qb = build_list_query(query);
        let rows: Vec<SiteRow> = qb.build_query_as().fetch_all(self.pool.as_ref()).await?;

        Ok(rows.into_iter().map(Site::from).collect())
    }

    async fn count(&self, query: &SiteCountQuery) -> Result<i64, AppError> {
        let mut qb = build_count_query(query);
        let total: i64 = qb.build_query_scalar().fetch_one(self.pool.as_ref()).await?;

        Ok(total)
    }

    async fn match_ips(&self, pattern: &LikePattern) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT site_id
            FROM registration_log
            WHERE ip LIKE $1 ESCAPE '\'
            "#,
        )
        .bind(pattern.to_like())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }

    async fn users_for_site(&self, site_id: i64, limit: i64) -> Result<Vec<SiteUser>, AppError> {
        let rows = sqlx::query_as::<_, SiteUserRow>(
            r#"
            SELECT u.id, u.login, u.email
            FROM site_users su
            JOIN users u ON u.id = su.user_id
            WHERE su.site_id = $1
            ORDER BY u.id
            LIMIT $2
            "#,
        )
        .bind(site_id)
        .bind(limit.max(0))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SiteUser {
                id: row.id,
                login: row.login,
                email: row.email,
            })
            .collect())
    }

    async fn count_sites(&self, network_id: i64, limit: i64) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM (SELECT 1 FROM sites WHERE network_id = $1 LIMIT $2) bounded",
        )
        .bind(network_id)
        .bind(limit.max(0))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }
}
