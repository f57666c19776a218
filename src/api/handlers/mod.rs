//! HTTP request handlers for API endpoints.

pub mod health;
pub mod sites;

pub use health::health_handler;
pub use sites::site_list_handler;
