pub mod synthetics_service;
