//! Shared domain services (time expression parsing, range resolution)

pub mod time_expression;
