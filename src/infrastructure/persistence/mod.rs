//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries.
//!
//! # Repositories
//!
//! - [`PgSiteRepository`] - Site listing, counts, IP lookup and members
//! - [`PgNetworkRepository`] - Network lookup
//! - [`PgTokenRepository`] - API token storage and validation
//! - [`SiteCountPolicy`] - Large-network signal from the site count

pub mod pg_network_repository;
pub mod pg_site_repository;
pub mod pg_token_repository;
pub mod site_count_policy;

pub use pg_network_repository::PgNetworkRepository;
pub use pg_site_repository::PgSiteRepository;
pub use pg_token_repository::PgTokenRepository;
pub use site_count_policy::SiteCountPolicy;
