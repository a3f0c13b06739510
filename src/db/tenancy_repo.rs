// src/db/tenancy_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::store::TenantStore,
    models::tenancy::{NewContact, NewOccupancy, NewTenant, Occupancy, Tenant, TenantContact},
};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for TenantRepository {
    async fn create_tenant(&self, input: NewTenant) -> Result<Tenant, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (
                tenant_name, tenant_type, status, mailing_address, notes,
                tax_id, business_type, number_of_employees, website
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
            .bind(&input.tenant_name)
            .bind(&input.tenant_type)
            .bind(&input.status)
            .bind(&input.mailing_address)
            .bind(&input.notes)
            .bind(&input.tax_id)
            .bind(&input.business_type)
            .bind(input.number_of_employees)
            .bind(&input.website)
            .fetch_one(&self.pool)
            .await?;

        Ok(tenant)
    }

    async fn create_contact(&self, input: NewContact) -> Result<TenantContact, AppError> {
        let contact = sqlx::query_as::<_, TenantContact>(
            r#"
            INSERT INTO tenant_contacts (
                tenant_id, contact_name, contact_email, contact_phone,
                contact_title, classifications, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(input.tenant_id)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.contact_title)
            .bind(&input.classifications)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(contact)
    }

    async fn create_occupancy(&self, input: NewOccupancy) -> Result<Occupancy, AppError> {
        let occupancy = sqlx::query_as::<_, Occupancy>(
            r#"
            INSERT INTO occupancies (
                tenant_id, property_id, unit_id, move_in_date, move_out_date, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(input.tenant_id)
            .bind(input.property_id)
            .bind(input.unit_id)
            .bind(input.move_in_date)
            .bind(input.move_out_date)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(occupancy)
    }
}
