//! Domain layer: entities, listing rules and repository interfaces.
//!
//! Nothing here depends on the database, HTTP or templates.
//!
//! - [`entities`] - Sites, networks and site members
//! - [`listing`] - Search classification, query building, pagination policy, row state
//! - [`permissions`] - Capabilities and the permission checks the listing consults
//! - [`repositories`] - Data access trait definitions

pub mod entities;
pub mod listing;
pub mod permissions;
pub mod repositories;
