pub mod query_builder;
pub mod query_params;
pub mod query_spec;
