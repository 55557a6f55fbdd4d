//! Subcommand declarations (e.g., `ddctl apm spans list`)

pub mod apm_routes;
pub mod auth_routes;
pub mod catalog_routes;
pub mod logs_routes;
pub mod metrics_routes;
pub mod monitors_routes;
pub mod resource_routes;
