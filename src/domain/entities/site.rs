//! Site entity: one sub-site of a hosting network.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-only projection of a site as shown in the network sites listing.
///
/// The four status flags are independent; a site may be archived and marked
/// as spam at the same time. `registered` and `last_updated` are `None` when
/// the store holds the "never" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub id: i64,
    pub network_id: i64,
    pub domain: String,
    pub path: String,
    pub registered: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub archived: bool,
    pub spam: bool,
    pub deleted: bool,
    pub mature: bool,
    pub title: Option<String>,
    pub tagline: Option<String>,
}

impl Site {
    /// Creates a site with all status flags cleared.
    pub fn new(id: i64, network_id: i64, domain: String, path: String) -> Self {
        Self {
            id,
            network_id,
            domain,
            path,
            registered: None,
            last_updated: None,
            archived: false,
            spam: false,
            deleted: false,
            mature: false,
            title: None,
            tagline: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_new_has_no_flags() {
        let site = Site::new(3, 1, "blog.example.com".to_string(), "/".to_string());

        assert_eq!(site.id, 3);
        assert_eq!(site.network_id, 1);
        assert!(!site.archived);
        assert!(!site.spam);
        assert!(!site.deleted);
        assert!(!site.mature);
        assert!(site.registered.is_none());
        assert!(site.last_updated.is_none());
    }
}
