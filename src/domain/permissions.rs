//! Viewer capabilities and the permission checks the sites listing relies on.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A named capability granted to an API token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// View and moderate the network's sites.
    ManageSites,
    /// Delete sites, individually or in bulk.
    DeleteSites,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::ManageSites, Capability::DeleteSites];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageSites => "manage_sites",
            Capability::DeleteSites => "delete_sites",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manage_sites" => Ok(Capability::ManageSites),
            "delete_sites" => Ok(Capability::DeleteSites),
            other => Err(format!("unknown capability '{other}'")),
        }
    }
}

/// Permission checks consulted while building the sites listing.
#[cfg_attr(test, mockall::automock)]
pub trait Permissions: Send + Sync {
    /// Gates the whole listing.
    fn can_manage_sites(&self) -> bool;

    /// Gates the bulk `delete` action.
    fn can_delete_sites(&self) -> bool;

    /// Gates the per-row `delete` action.
    fn can_delete_site(&self, site_id: i64) -> bool;
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub token_id: i64,
    pub name: String,
    capabilities: HashSet<Capability>,
    main_site_id: i64,
}

impl Viewer {
    pub fn new(
        token_id: i64,
        name: String,
        capabilities: impl IntoIterator<Item = Capability>,
        main_site_id: i64,
    ) -> Self {
        Self {
            token_id,
            name,
            capabilities: capabilities.into_iter().collect(),
            main_site_id,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl Permissions for Viewer {
    fn can_manage_sites(&self) -> bool {
        self.has(Capability::ManageSites)
    }

    fn can_delete_sites(&self) -> bool {
        self.has(Capability::DeleteSites)
    }

    // The main site can never be deleted.
    fn can_delete_site(&self, site_id: i64) -> bool {
        self.has(Capability::DeleteSites) && site_id != self.main_site_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_round_trips_through_str() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
        assert!("edit_posts".parse::<Capability>().is_err());
    }

    #[test]
    fn test_viewer_without_delete_capability() {
        let viewer = Viewer::new(1, "ops".to_string(), [Capability::ManageSites], 1);

        assert!(viewer.can_manage_sites());
        assert!(!viewer.can_delete_sites());
        assert!(!viewer.can_delete_site(5));
    }

    #[test]
    fn test_viewer_cannot_delete_main_site() {
        let viewer = Viewer::new(1, "root".to_string(), Capability::ALL, 1);

        assert!(viewer.can_delete_sites());
        assert!(viewer.can_delete_site(5));
        assert!(!viewer.can_delete_site(1));
    }
}
