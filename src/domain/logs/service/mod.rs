pub mod logs_service;
