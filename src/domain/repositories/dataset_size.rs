//! Large-dataset signal consulted once per listing request.

use crate::error::AppError;
use async_trait::async_trait;

/// Decides whether a network is too large for exact counts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SiteCountPolicy`] - site count threshold
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatasetSizePolicy: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the signal cannot be read.
    async fn is_large_dataset(&self, network_id: i64) -> Result<bool, AppError>;
}
