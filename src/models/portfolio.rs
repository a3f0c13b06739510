// src/models/portfolio.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---
// 1. Property (O "Empreendimento")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Building (O "Prédio")
// ---
// Chave natural: (property_id, building_name)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: Uuid,
    pub property_id: Uuid,
    pub building_name: String,
    pub building_address: Option<String>,
    pub number_of_floors: Option<i32>,
    pub number_of_units: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBuilding {
    pub property_id: Uuid,
    pub building_name: String,
}

// ---
// 3. Unit (A "Sala" / "Suíte")
// ---
// Chave natural: (property_id, building_id, unit_number)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub property_id: Uuid,
    pub building_id: Uuid,
    pub unit_number: String,
    pub unit_type: String,
    pub unit_status: String,
    pub unit_square_footage: Option<i32>,
    pub unit_floor_number: Option<i32>,
    pub unit_monthly_rent: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_UNIT_TYPE: &str = "Office";
pub const DEFAULT_UNIT_STATUS: &str = "Occupied";

#[derive(Debug, Clone)]
pub struct NewUnit {
    pub property_id: Uuid,
    pub building_id: Uuid,
    pub unit_number: String,
    pub unit_type: String,
    pub unit_status: String,
}

impl NewUnit {
    /// Sala criada durante a importação: "Office" / "Occupied".
    pub fn occupied_office(property_id: Uuid, building_id: Uuid, unit_number: &str) -> Self {
        Self {
            property_id,
            building_id,
            unit_number: unit_number.to_string(),
            unit_type: DEFAULT_UNIT_TYPE.to_string(),
            unit_status: DEFAULT_UNIT_STATUS.to_string(),
        }
    }
}
