//! Middleware for the HTML pages.

pub mod web_auth;
