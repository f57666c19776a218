//! Application layer services.
//!
//! Services coordinate repository calls and domain rules and give HTTP
//! handlers a narrow API.
//!
//! # Available Services
//!
//! - [`services::site_list_service::SiteListService`] - Network sites listing
//! - [`services::auth_service::AuthService`] - API token authentication
//! - [`services::confirmation::HmacConfirmationIssuer`] - Tokens for row state transitions

pub mod services;
