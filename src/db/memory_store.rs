// src/db/memory_store.rs

//! Implementação em memória dos três stores.
//!
//! Serve para testes e para subir o app sem banco. Permite injetar falhas
//! (contato que "explode", delete de ticket que falha) para exercitar os
//! caminhos de erro dos serviços.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{PortfolioStore, TenantStore, TicketStore},
    models::{
        portfolio::{Building, NewBuilding, NewUnit, Property, Unit},
        tenancy::{NewContact, NewOccupancy, NewTenant, Occupancy, Tenant, TenantContact},
        ticket::{NewTicket, Ticket, TicketStatus},
    },
};

#[derive(Default)]
struct State {
    tickets: HashMap<Uuid, Ticket>,
    properties: Vec<Property>,
    buildings: Vec<Building>,
    units: Vec<Unit>,
    tenants: Vec<Tenant>,
    contacts: Vec<TenantContact>,
    occupancies: Vec<Occupancy>,

    delete_calls: Vec<Uuid>,
    failing_deletes: HashSet<Uuid>,
    failing_contact_names: HashSet<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // Um teste que entrou em pânico não deve envenenar os próximos
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- Sementes ---

    pub fn add_property(&self, name: &str) -> Property {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: None,
            created_at: now,
            updated_at: now,
        };
        self.state().properties.push(property.clone());
        property
    }

    pub fn add_building(&self, property_id: Uuid, building_name: &str) -> Building {
        let building = new_building(property_id, building_name);
        self.state().buildings.push(building.clone());
        building
    }

    pub fn insert_ticket(&self, ticket: Ticket) {
        self.state().tickets.insert(ticket.id, ticket);
    }

    // --- Injeção de falhas ---

    pub fn fail_delete_of(&self, ticket_id: Uuid) {
        self.state().failing_deletes.insert(ticket_id);
    }

    pub fn fail_contact_named(&self, contact_name: &str) {
        self.state().failing_contact_names.insert(contact_name.to_string());
    }

    // --- Inspeção ---

    pub fn tickets(&self) -> Vec<Ticket> {
        self.state().tickets.values().cloned().collect()
    }

    pub fn delete_calls(&self) -> Vec<Uuid> {
        self.state().delete_calls.clone()
    }

    pub fn buildings(&self) -> Vec<Building> {
        self.state().buildings.clone()
    }

    pub fn units(&self) -> Vec<Unit> {
        self.state().units.clone()
    }

    pub fn tenants(&self) -> Vec<Tenant> {
        self.state().tenants.clone()
    }

    pub fn contacts(&self) -> Vec<TenantContact> {
        self.state().contacts.clone()
    }

    pub fn occupancies(&self) -> Vec<Occupancy> {
        self.state().occupancies.clone()
    }
}

fn new_building(property_id: Uuid, building_name: &str) -> Building {
    let now = Utc::now();
    Building {
        id: Uuid::new_v4(),
        property_id,
        building_name: building_name.to_string(),
        building_address: None,
        number_of_floors: None,
        number_of_units: None,
        created_at: now,
        updated_at: now,
    }
}

fn update_ticket(
    state: &mut State,
    id: Uuid,
    change: impl FnOnce(&mut Ticket),
) -> Result<Ticket, AppError> {
    let ticket = state.tickets.get_mut(&id).ok_or(AppError::TicketNotFound(id))?;
    change(ticket);
    ticket.updated_at = Some(Utc::now());
    Ok(ticket.clone())
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, AppError> {
        Ok(self.tickets())
    }

    async fn create_ticket(&self, input: NewTicket) -> Result<Ticket, AppError> {
        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            property_id: input.property_id,
            date_created: Some(input.date_created),
            date_completed: None,
            deleted_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.insert_ticket(ticket.clone());
        Ok(ticket)
    }

    async fn complete_ticket(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Ticket, AppError> {
        update_ticket(&mut self.state(), id, |ticket| {
            ticket.status = TicketStatus::Completed;
            ticket.date_completed = Some(completed_at);
        })
    }

    async fn soft_delete_ticket(
        &self,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<Ticket, AppError> {
        update_ticket(&mut self.state(), id, |ticket| {
            ticket.deleted_at = Some(deleted_at);
        })
    }

    async fn restore_ticket(&self, id: Uuid) -> Result<Ticket, AppError> {
        update_ticket(&mut self.state(), id, |ticket| {
            ticket.deleted_at = None;
        })
    }

    async fn delete_ticket(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state();
        state.delete_calls.push(id);

        if state.failing_deletes.contains(&id) {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "delete de {} recusado",
                id
            )));
        }

        state
            .tickets
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::TicketNotFound(id))
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn find_property_by_name(&self, name: &str) -> Result<Option<Property>, AppError> {
        Ok(self.state().properties.iter().find(|p| p.name == name).cloned())
    }

    async fn list_buildings(&self, property_id: Uuid) -> Result<Vec<Building>, AppError> {
        Ok(self
            .state()
            .buildings
            .iter()
            .filter(|b| b.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn create_building(&self, input: NewBuilding) -> Result<Building, AppError> {
        Ok(self.add_building(input.property_id, &input.building_name))
    }

    async fn find_unit(
        &self,
        property_id: Uuid,
        building_id: Uuid,
        unit_number: &str,
    ) -> Result<Option<Unit>, AppError> {
        Ok(self
            .state()
            .units
            .iter()
            .find(|u| {
                u.property_id == property_id
                    && u.building_id == building_id
                    && u.unit_number == unit_number
            })
            .cloned())
    }

    async fn create_unit(&self, input: NewUnit) -> Result<Unit, AppError> {
        let now = Utc::now();
        let unit = Unit {
            id: Uuid::new_v4(),
            property_id: input.property_id,
            building_id: input.building_id,
            unit_number: input.unit_number,
            unit_type: input.unit_type,
            unit_status: input.unit_status,
            unit_square_footage: None,
            unit_floor_number: None,
            unit_monthly_rent: None,
            created_at: now,
            updated_at: now,
        };
        self.state().units.push(unit.clone());
        Ok(unit)
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn create_tenant(&self, input: NewTenant) -> Result<Tenant, AppError> {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            tenant_name: input.tenant_name,
            tenant_type: input.tenant_type,
            status: input.status,
            mailing_address: input.mailing_address,
            notes: input.notes,
            tax_id: input.tax_id,
            business_type: input.business_type,
            number_of_employees: input.number_of_employees,
            website: input.website,
            created_at: now,
            updated_at: now,
        };
        self.state().tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn create_contact(&self, input: NewContact) -> Result<TenantContact, AppError> {
        let mut state = self.state();

        if state.failing_contact_names.contains(&input.contact_name) {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "falha ao gravar o contato {}",
                input.contact_name
            )));
        }

        let now = Utc::now();
        let contact = TenantContact {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            contact_name: input.contact_name,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            contact_title: input.contact_title,
            classifications: input.classifications,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        state.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn create_occupancy(&self, input: NewOccupancy) -> Result<Occupancy, AppError> {
        let now = Utc::now();
        let occupancy = Occupancy {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            property_id: input.property_id,
            unit_id: input.unit_id,
            move_in_date: input.move_in_date,
            move_out_date: input.move_out_date,
            status: input.status,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        self.state().occupancies.push(occupancy.clone());
        Ok(occupancy)
    }
}
