//! Domain entities representing core business objects.

pub mod network;
pub mod site;
pub mod site_user;

pub use network::{InstallMode, Network};
pub use site::Site;
pub use site_user::SiteUser;
