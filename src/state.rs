//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, SiteListService};
use crate::domain::entities::Network;
use crate::domain::repositories::SiteRepository;

#[derive(Clone)]
pub struct AppState {
    pub site_list_service: Arc<SiteListService>,
    pub auth_service: Arc<AuthService>,
    pub sites: Arc<dyn SiteRepository>,
    /// The administered network, loaded once at startup.
    pub network: Arc<Network>,
}
