//! Controllers: connect CLI routes to domain services

pub mod apm;
pub mod auth;
pub mod catalog;
pub mod logs;
pub mod metric;
pub mod monitor;
pub mod resource;
