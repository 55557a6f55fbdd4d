//! Command-line surface: clap routes, controllers, request DTOs and output

pub mod controller;
pub mod dto;
pub mod routes;
pub mod util;
