pub mod compute;
pub mod field_spec;
pub mod raw_record;
pub mod standard_fields;
