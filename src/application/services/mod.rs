//! Business logic services for the application layer.

pub mod auth_service;
pub mod confirmation;
pub mod site_list_service;

pub use auth_service::AuthService;
pub use confirmation::{ConfirmationError, ConfirmationIssuer, HmacConfirmationIssuer};
pub use site_list_service::{ListRequest, ListedSite, SiteListPage, SiteListService};
