// src/models/import.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// =============================================================================
//  ENTRADA: o documento JSON gerado a partir da planilha do empreendimento
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFile {
    #[serde(default)]
    pub metadata: Option<ImportMetadata>,
    pub tenants: Vec<TenantRecord>,
}

impl ImportFile {
    pub fn from_json(raw: impl AsRef<[u8]>) -> Result<Self, AppError> {
        Ok(serde_json::from_slice(raw.as_ref())?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    pub source_file: Option<String>,
    pub generated_at: Option<String>,
    pub total_tenants: Option<usize>,
    pub note: Option<String>,
}

// Só espaços conta como vazio: o nome é gravado já sem eles
fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.add_param("min".into(), &1);
        err.message = Some("O nome do inquilino é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TenantRecord {
    // Ausente vira "", e a validação reprova só este inquilino (não o arquivo todo)
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub tenant_name: String,
    pub tenant_type: Option<String>,
    pub status: Option<String>,
    pub mailing_address: Option<String>,
    pub notes: Option<String>,
    pub tax_id: Option<String>,
    pub business_type: Option<String>,
    pub number_of_employees: Option<i32>,
    pub website: Option<String>,
    #[serde(default)]
    pub contacts: Vec<ContactRecord>,
    #[serde(default)]
    pub occupancies: Vec<OccupancyRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_title: Option<String>,
    pub classifications: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyRecord {
    // Só informativo: a propriedade da importação é resolvida uma vez por execução
    pub property_name: Option<String>,
    pub building_number: Option<String>,
    pub unit_number: Option<String>,
    pub move_in_date: Option<String>,
    pub move_out_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
//  SAÍDA: relatório da execução e plano do "dry run"
// =============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TenantFailure {
    // Posição (base 0) do inquilino no arquivo
    pub index: usize,
    pub tenant_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub property_id: Uuid,
    // número do prédio -> id
    pub buildings: BTreeMap<String, Uuid>,
    pub success_count: usize,
    pub error_count: usize,
    pub contacts_created: usize,
    pub contacts_skipped: usize,
    pub occupancies_created: usize,
    pub occupancies_skipped: usize,
    pub units_created: usize,
    pub failures: Vec<TenantFailure>,
}

impl ImportReport {
    pub fn new(property_id: Uuid, buildings: BTreeMap<String, Uuid>) -> Self {
        Self {
            property_id,
            buildings,
            success_count: 0,
            error_count: 0,
            contacts_created: 0,
            contacts_skipped: 0,
            occupancies_created: 0,
            occupancies_skipped: 0,
            units_created: 0,
            failures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPlan {
    pub tenants: usize,
    pub contacts_to_create: usize,
    pub contacts_skipped: usize,
    pub occupancies_to_create: usize,
    pub occupancies_skipped: usize,
    pub invalid_tenants: Vec<TenantFailure>,
}
