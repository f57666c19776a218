//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access; concrete implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`SiteRepository`] - Listing, counting and IP lookup for sites
//! - [`NetworkRepository`] - Network (tenant) lookup
//! - [`DatasetSizePolicy`] - Large-network signal
//! - [`TokenRepository`] - API token authentication

pub mod dataset_size;
pub mod network_repository;
pub mod site_repository;
pub mod token_repository;

pub use dataset_size::DatasetSizePolicy;
pub use network_repository::NetworkRepository;
pub use site_repository::SiteRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use dataset_size::MockDatasetSizePolicy;
#[cfg(test)]
pub use network_repository::MockNetworkRepository;
#[cfg(test)]
pub use site_repository::MockSiteRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
