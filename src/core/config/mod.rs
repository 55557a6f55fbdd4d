pub mod context_config;
