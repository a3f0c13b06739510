pub mod store;
pub mod memory_store;
pub mod ticket_repo;
pub use ticket_repo::TicketRepository;
pub mod portfolio_repo;
pub use portfolio_repo::PortfolioRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
