//! Site member shown in the users column of the sites listing.

use serde::Serialize;

/// A user registered on a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteUser {
    pub id: i64,
    pub login: String,
    pub email: String,
}
