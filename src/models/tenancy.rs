// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---
// 1. Tenant (O "Inquilino")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub tenant_name: String,
    pub tenant_type: String,
    pub status: String,
    pub mailing_address: Option<String>,
    pub notes: Option<String>,
    pub tax_id: Option<String>,
    pub business_type: Option<String>,
    pub number_of_employees: Option<i32>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    pub tenant_name: String,
    pub tenant_type: String,
    pub status: String,
    pub mailing_address: Option<String>,
    pub notes: Option<String>,
    pub tax_id: Option<String>,
    pub business_type: Option<String>,
    pub number_of_employees: Option<i32>,
    pub website: Option<String>,
}

// ---
// 2. TenantContact (Os contatos do inquilino)
// ---
// Pertence a exatamente um Tenant. `classifications` nunca é vazio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TenantContact {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_title: Option<String>,
    pub classifications: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub tenant_id: Uuid,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_title: Option<String>,
    pub classifications: Vec<String>,
    pub notes: Option<String>,
}

// ---
// 3. Occupancy (A "Ocupação")
// ---
// Liga o Tenant à Property e, opcionalmente, a uma Unit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Occupancy {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub move_in_date: Option<DateTime<Utc>>,
    pub move_out_date: Option<DateTime<Utc>>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOccupancy {
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub move_in_date: Option<DateTime<Utc>>,
    pub move_out_date: Option<DateTime<Utc>>,
    pub status: String,
    pub notes: Option<String>,
}
