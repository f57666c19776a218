//! Repository trait for reading the network's sites.

use crate::domain::entities::{Site, SiteUser};
use crate::domain::listing::{LikePattern, SiteCountQuery, SiteQuery};
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to sites, their registration log, and their members.
///
/// The listing never writes: state transitions are performed elsewhere,
/// after confirmation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSiteRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Runs a bounded listing query.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, query: &SiteQuery) -> Result<Vec<Site>, AppError>;

    /// Counts the rows matched by the listing query's filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, query: &SiteCountQuery) -> Result<i64, AppError>;

    /// Site ids whose registration IP matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn match_ips(&self, pattern: &LikePattern) -> Result<Vec<i64>, AppError>;

    /// Members of a site, ordered by id, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn users_for_site(&self, site_id: i64, limit: i64) -> Result<Vec<SiteUser>, AppError>;

    /// Unfiltered number of sites in a network, counting at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_sites(&self, network_id: i64, limit: i64) -> Result<i64, AppError>;
}
