//! Large-dataset signal based on the network's site count.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::repositories::{DatasetSizePolicy, SiteRepository};
use crate::error::AppError;

/// A network is large once it holds more than `threshold` sites. Counting
/// stops one row past the threshold.
pub struct SiteCountPolicy {
    sites: Arc<dyn SiteRepository>,
    threshold: i64,
}

impl SiteCountPolicy {
    pub fn new(sites: Arc<dyn SiteRepository>, threshold: i64) -> Self {
        Self { sites, threshold }
    }
}

#[async_trait]
impl DatasetSizePolicy for SiteCountPolicy {
    async fn is_large_dataset(&self, network_id: i64) -> Result<bool, AppError> {
        let total = self
            .sites
            .count_sites(network_id, self.threshold.saturating_add(1))
            .await?;
        Ok(total > self.threshold)
    }
}
