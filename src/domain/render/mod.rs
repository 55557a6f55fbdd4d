pub mod report;
pub mod sparkline;
pub mod table_renderer;
