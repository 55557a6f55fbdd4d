//! Domain services, one area per command group, on top of the shared
//! query builder, normalizer and renderer.

pub mod apm;
pub mod auth;
pub mod catalog;
pub mod common;
pub mod dashboard;
pub mod incident;
pub mod logs;
pub mod metric;
pub mod monitor;
pub mod normalize;
pub mod query;
pub mod render;
pub mod synthetics;
pub mod troubleshoot;
