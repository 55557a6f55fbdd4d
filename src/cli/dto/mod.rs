//! Command-line request DTOs, validated before any request is sent

pub mod apm_dto;
pub mod catalog_dto;
pub mod logs_dto;
pub mod metrics_dto;
pub mod monitors_dto;
pub mod resource_dto;
