pub mod k8s_resources_service;
pub mod metric_query_service;
pub mod tag_cardinality_service;
