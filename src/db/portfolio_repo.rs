// src/db/portfolio_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::PortfolioStore,
    models::portfolio::{Building, NewBuilding, NewUnit, Property, Unit},
};

// Propriedades, prédios e salas: tudo que é "lookup-or-create" na importação
#[derive(Clone)]
pub struct PortfolioRepository {
    pool: PgPool,
}

impl PortfolioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioStore for PortfolioRepository {
    async fn find_property_by_name(&self, name: &str) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, name, address, created_at, updated_at
            FROM properties
            WHERE name = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(property)
    }

    async fn list_buildings(&self, property_id: Uuid) -> Result<Vec<Building>, AppError> {
        let buildings = sqlx::query_as::<_, Building>(
            r#"
            SELECT id, property_id, building_name, building_address,
                   number_of_floors, number_of_units, created_at, updated_at
            FROM buildings
            WHERE property_id = $1
            ORDER BY created_at
            "#,
        )
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(buildings)
    }

    async fn create_building(&self, input: NewBuilding) -> Result<Building, AppError> {
        let building = sqlx::query_as::<_, Building>(
            r#"
            INSERT INTO buildings (property_id, building_name)
            VALUES ($1, $2)
            RETURNING id, property_id, building_name, building_address,
                      number_of_floors, number_of_units, created_at, updated_at
            "#,
        )
            .bind(input.property_id)
            .bind(&input.building_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(building)
    }

    async fn find_unit(
        &self,
        property_id: Uuid,
        building_id: Uuid,
        unit_number: &str,
    ) -> Result<Option<Unit>, AppError> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, building_id, unit_number, unit_type, unit_status,
                   unit_square_footage, unit_floor_number, unit_monthly_rent,
                   created_at, updated_at
            FROM units
            WHERE property_id = $1 AND building_id = $2 AND unit_number = $3
            LIMIT 1
            "#,
        )
            .bind(property_id)
            .bind(building_id)
            .bind(unit_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(unit)
    }

    async fn create_unit(&self, input: NewUnit) -> Result<Unit, AppError> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (property_id, building_id, unit_number, unit_type, unit_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, property_id, building_id, unit_number, unit_type, unit_status,
                      unit_square_footage, unit_floor_number, unit_monthly_rent,
                      created_at, updated_at
            "#,
        )
            .bind(input.property_id)
            .bind(input.building_id)
            .bind(&input.unit_number)
            .bind(&input.unit_type)
            .bind(&input.unit_status)
            .fetch_one(&self.pool)
            .await?;

        Ok(unit)
    }
}
