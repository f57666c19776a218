//! Repository trait for network lookup.

use crate::domain::entities::Network;
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkRepository: Send + Sync {
    /// Loads a network with its main site id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Network>, AppError>;
}
