//! Startup services.

pub mod admin_bootstrap;

pub use admin_bootstrap::bootstrap_admin;
