// src/db/store.rs

//! Interfaces de acesso a dados.
//!
//! Os serviços recebem estes traits (como `Arc<dyn ...>`) em vez de um
//! handle global do banco. Em produção são os repositórios Postgres; nos
//! testes, o `MemoryStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        portfolio::{Building, NewBuilding, NewUnit, Property, Unit},
        tenancy::{NewContact, NewOccupancy, NewTenant, Occupancy, Tenant, TenantContact},
        ticket::{NewTicket, Ticket},
    },
};

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, AppError>;

    async fn create_ticket(&self, input: NewTicket) -> Result<Ticket, AppError>;

    /// `status = Completed` e `date_completed = completed_at`.
    async fn complete_ticket(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Ticket, AppError>;

    /// Manda para a lixeira (`deleted_at = deleted_at`).
    async fn soft_delete_ticket(
        &self,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<Ticket, AppError>;

    async fn restore_ticket(&self, id: Uuid) -> Result<Ticket, AppError>;

    /// Remoção definitiva.
    async fn delete_ticket(&self, id: Uuid) -> Result<(), AppError>;
}

// ---------------------------------------------------------------------------
// Empreendimentos, prédios e salas
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Busca por nome exato.
    async fn find_property_by_name(&self, name: &str) -> Result<Option<Property>, AppError>;

    /// Prédios da propriedade, em ordem de criação.
    async fn list_buildings(&self, property_id: Uuid) -> Result<Vec<Building>, AppError>;

    async fn create_building(&self, input: NewBuilding) -> Result<Building, AppError>;

    async fn find_unit(
        &self,
        property_id: Uuid,
        building_id: Uuid,
        unit_number: &str,
    ) -> Result<Option<Unit>, AppError>;

    async fn create_unit(&self, input: NewUnit) -> Result<Unit, AppError>;
}

// ---------------------------------------------------------------------------
// Inquilinos, contatos e ocupações
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn create_tenant(&self, input: NewTenant) -> Result<Tenant, AppError>;

    async fn create_contact(&self, input: NewContact) -> Result<TenantContact, AppError>;

    async fn create_occupancy(&self, input: NewOccupancy) -> Result<Occupancy, AppError>;
}
