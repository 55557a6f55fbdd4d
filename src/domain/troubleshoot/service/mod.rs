pub mod troubleshoot_service;
