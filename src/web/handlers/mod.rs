//! HTML page handlers.

mod login;
mod sites;

pub use login::{login_handler, login_submit_handler, logout_handler};
pub use sites::{SitesTemplate, sites_handler, sites_template};
