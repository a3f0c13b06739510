pub mod import;
pub mod portfolio;
pub mod tenancy;
pub mod ticket;
