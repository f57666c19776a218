//! Server-rendered admin pages.
//!
//! Pages are rendered with Askama; each listing column has its own cell
//! template under `templates/cells/`.

pub mod handlers;
pub mod middleware;
pub mod routes;
