//! Network entity: the tenant group that owns a set of sites.

use serde::{Deserialize, Serialize};

use super::Site;

/// How sites of a network are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMode {
    /// `blog.example.com`
    Subdomain,
    /// `example.com/blog/`
    Subdirectory,
}

/// The network whose sites are being administered.
///
/// Loaded once at startup and shared read-only; every request captures the
/// same value, so the installation mode cannot change mid-request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: i64,
    pub domain: String,
    pub path: String,
    pub install_mode: InstallMode,
    pub main_site_id: i64,
}

impl Network {
    pub fn new(
        id: i64,
        domain: String,
        path: String,
        install_mode: InstallMode,
        main_site_id: i64,
    ) -> Self {
        Self {
            id,
            domain,
            path,
            install_mode,
            main_site_id,
        }
    }

    pub fn is_subdomain_install(&self) -> bool {
        self.install_mode == InstallMode::Subdomain
    }

    pub fn is_main_site(&self, site_id: i64) -> bool {
        self.main_site_id == site_id
    }

    /// `.example.com` for a network on `example.com`.
    pub fn domain_suffix(&self) -> String {
        format!(".{}", self.domain)
    }

    /// Name shown for a site: its subdomain label on subdomain installs,
    /// its path on subdirectory installs.
    pub fn display_name(&self, site: &Site) -> String {
        match self.install_mode {
            InstallMode::Subdomain => site.domain.replace(&self.domain_suffix(), ""),
            InstallMode::Subdirectory => site.path.clone(),
        }
    }

    /// Public home URL of a site.
    pub fn home_url(&self, site: &Site) -> String {
        format!("https://{}{}", site.domain, site.path)
    }

    /// Admin dashboard URL of a site.
    pub fn dashboard_url(&self, site: &Site) -> String {
        format!("https://{}{}admin/", site.domain, site.path)
    }
}
