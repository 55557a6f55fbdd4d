//! Infrastructure: HTTP transport, context configuration, formatting helpers

pub mod client;
pub mod config;
pub mod util;
