pub mod errors_service;
pub mod spans_service;
