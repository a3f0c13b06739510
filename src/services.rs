pub mod import_service;
pub mod ticket_service;
