//! Data Transfer Objects for API requests and responses.
//!
//! Query DTOs use Serde and `serde_with` for lenient parsing and `validator`
//! for range checks.

pub mod health;
pub mod sites;
