// src/services/import_service.rs

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, timestamp::parse_timestamp_str},
    db::store::{PortfolioStore, TenantStore},
    models::{
        import::{
            ContactRecord, ImportFile, ImportPlan, ImportReport, OccupancyRecord, TenantFailure,
            TenantRecord,
        },
        portfolio::{Building, NewBuilding, NewUnit},
        tenancy::{NewContact, NewOccupancy, NewTenant},
    },
};

pub const DEFAULT_TENANT_TYPE: &str = "Commercial";
pub const DEFAULT_STATUS: &str = "Active";
pub const DEFAULT_CLASSIFICATION: &str = "Secondary";
pub const PLACEHOLDER_CONTACT_NAME: &str = "TBD";

// ---
// Prédios esperados na importação
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedBuilding {
    pub number: String,
    pub name: String,
}

impl ExpectedBuilding {
    pub fn new(number: &str) -> Self {
        Self {
            number: number.to_string(),
            name: format!("Building {}", number),
        }
    }

    /// "Building 1" .. "Building 5"
    pub fn defaults() -> Vec<Self> {
        (1..=5).map(|n| Self::new(&n.to_string())).collect()
    }
}

// Quão bem um nome de prédio casa com o esperado (maior = melhor)
fn match_rank(building_name: &str, expected: &ExpectedBuilding) -> Option<u8> {
    if building_name == expected.name {
        Some(3)
    } else if building_name == format!("Building #{}", expected.number) {
        Some(2)
    } else if building_name.contains(&expected.number) {
        Some(1)
    } else {
        None
    }
}

/// Escolhe, para cada número esperado, o prédio existente que melhor casa.
/// Empate de rank fica com o último da lista.
fn match_existing_buildings(
    existing: &[Building],
    expected: &[ExpectedBuilding],
) -> BTreeMap<String, Uuid> {
    let mut best: BTreeMap<String, (u8, Uuid)> = BTreeMap::new();

    for building in existing {
        for exp in expected {
            let Some(rank) = match_rank(&building.building_name, exp) else {
                continue;
            };
            let keep_current = best
                .get(&exp.number)
                .is_some_and(|(current, _)| *current > rank);
            if !keep_current {
                best.insert(exp.number.clone(), (rank, building.id));
            }
        }
    }

    best.into_iter().map(|(number, (_, id))| (number, id)).collect()
}

// "" e só-espaços viram None
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn usable_contact_name(contact: &ContactRecord) -> Option<String> {
    non_empty(&contact.contact_name).filter(|name| name != PLACEHOLDER_CONTACT_NAME)
}

fn parse_optional_date(value: &Option<String>) -> Result<Option<DateTime<Utc>>, AppError> {
    non_empty(value).map(|v| parse_timestamp_str(&v)).transpose()
}

fn new_tenant(record: &TenantRecord) -> NewTenant {
    NewTenant {
        tenant_name: record.tenant_name.trim().to_string(),
        tenant_type: non_empty(&record.tenant_type)
            .unwrap_or_else(|| DEFAULT_TENANT_TYPE.to_string()),
        status: non_empty(&record.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        mailing_address: non_empty(&record.mailing_address),
        notes: non_empty(&record.notes),
        tax_id: non_empty(&record.tax_id),
        business_type: non_empty(&record.business_type),
        number_of_employees: record.number_of_employees,
        website: non_empty(&record.website),
    }
}

fn new_contact(tenant_id: Uuid, contact_name: String, contact: &ContactRecord) -> NewContact {
    let classifications = contact
        .classifications
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_CLASSIFICATION.to_string()]);

    NewContact {
        tenant_id,
        contact_name,
        contact_email: non_empty(&contact.contact_email),
        contact_phone: non_empty(&contact.contact_phone),
        contact_title: non_empty(&contact.contact_title),
        classifications,
        notes: non_empty(&contact.notes),
    }
}

// Contadores de um único inquilino; só entram no relatório se ele terminar bem
#[derive(Default)]
struct TenantTally {
    contacts_created: usize,
    contacts_skipped: usize,
    occupancies_created: usize,
    occupancies_skipped: usize,
    units_created: usize,
}

// Resolvidos uma vez por execução e compartilhados por todos os inquilinos
struct ImportContext<'a> {
    property_id: Uuid,
    buildings: &'a BTreeMap<String, Uuid>,
}

#[derive(Clone)]
pub struct TenantImportService {
    portfolio: Arc<dyn PortfolioStore>,
    tenants: Arc<dyn TenantStore>,
    expected_buildings: Vec<ExpectedBuilding>,
}

impl TenantImportService {
    pub fn new(portfolio: Arc<dyn PortfolioStore>, tenants: Arc<dyn TenantStore>) -> Self {
        Self {
            portfolio,
            tenants,
            expected_buildings: ExpectedBuilding::defaults(),
        }
    }

    pub fn with_expected_buildings(mut self, expected: Vec<ExpectedBuilding>) -> Self {
        self.expected_buildings = expected;
        self
    }

    // =========================================================================
    //  1. PROPRIEDADE
    // =========================================================================

    /// Sem a propriedade não há importação: nada é gravado.
    pub async fn resolve_property(&self, property_name: &str) -> Result<Uuid, AppError> {
        let property = self
            .portfolio
            .find_property_by_name(property_name)
            .await?
            .ok_or_else(|| AppError::PropertyNotFound(property_name.to_string()))?;

        tracing::info!("✓ Propriedade encontrada: {} ({})", property.name, property.id);
        Ok(property.id)
    }

    // =========================================================================
    //  2. PRÉDIOS (lookup-or-create)
    // =========================================================================

    /// Mapa número -> id para todos os prédios esperados. Rodar de novo
    /// devolve os mesmos ids: os criados aqui casam pelo nome exato depois.
    pub async fn resolve_buildings(
        &self,
        property_id: Uuid,
    ) -> Result<BTreeMap<String, Uuid>, AppError> {
        let existing = self.portfolio.list_buildings(property_id).await?;
        let mut resolved = match_existing_buildings(&existing, &self.expected_buildings);

        for expected in &self.expected_buildings {
            if let Some(id) = resolved.get(&expected.number) {
                tracing::info!("✓ Prédio {} encontrado: {}", expected.number, id);
                continue;
            }

            let building = self
                .portfolio
                .create_building(NewBuilding {
                    property_id,
                    building_name: expected.name.clone(),
                })
                .await?;

            tracing::info!("✓ Prédio {} criado: {}", expected.number, building.id);
            resolved.insert(expected.number.clone(), building.id);
        }

        Ok(resolved)
    }

    // =========================================================================
    //  3. SALAS (lookup-or-create)
    // =========================================================================

    /// Devolve o id da sala e se ela foi criada agora.
    pub async fn resolve_unit(
        &self,
        property_id: Uuid,
        building_id: Uuid,
        unit_number: &str,
    ) -> Result<(Uuid, bool), AppError> {
        if let Some(unit) = self
            .portfolio
            .find_unit(property_id, building_id, unit_number)
            .await?
        {
            return Ok((unit.id, false));
        }

        let unit = self
            .portfolio
            .create_unit(NewUnit::occupied_office(property_id, building_id, unit_number))
            .await?;

        tracing::info!("    ✓ Sala criada: {} ({})", unit_number, unit.id);
        Ok((unit.id, true))
    }

    // =========================================================================
    //  4. IMPORTAÇÃO COMPLETA
    // =========================================================================

    /// Importa inquilinos, contatos e ocupações, um inquilino por vez.
    ///
    /// Só falhas de pré-condição (propriedade, prédios) abortam a execução.
    /// O erro de um inquilino é contado e o lote segue; o que ele já gravou
    /// fica gravado.
    pub async fn import(
        &self,
        property_name: &str,
        file: &ImportFile,
    ) -> Result<ImportReport, AppError> {
        tracing::info!("=== IMPORTAÇÃO DE INQUILINOS ===");
        if let Some(metadata) = &file.metadata {
            tracing::info!(
                "Arquivo de origem: {}, gerado em {}",
                metadata.source_file.as_deref().unwrap_or("-"),
                metadata.generated_at.as_deref().unwrap_or("-"),
            );
        }
        tracing::info!("✓ {} inquilino(s) no arquivo", file.tenants.len());

        let property_id = self.resolve_property(property_name).await?;
        let buildings = self.resolve_buildings(property_id).await?;
        let ctx = ImportContext { property_id, buildings: &buildings };

        let mut report = ImportReport::new(property_id, buildings.clone());
        let total = file.tenants.len();

        for (index, record) in file.tenants.iter().enumerate() {
            tracing::info!("[{}/{}] Processando: {}", index + 1, total, record.tenant_name);

            match self.import_tenant(&ctx, record).await {
                Ok(tally) => {
                    report.success_count += 1;
                    report.contacts_created += tally.contacts_created;
                    report.contacts_skipped += tally.contacts_skipped;
                    report.occupancies_created += tally.occupancies_created;
                    report.occupancies_skipped += tally.occupancies_skipped;
                    report.units_created += tally.units_created;
                }
                Err(e) => {
                    tracing::error!("  ✗ Erro ao processar {}: {}", record.tenant_name, e);
                    report.error_count += 1;
                    report.failures.push(TenantFailure {
                        index,
                        tenant_name: record.tenant_name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("=== IMPORTAÇÃO CONCLUÍDA ===");
        tracing::info!("✓ Importados com sucesso: {}", report.success_count);
        if report.error_count > 0 {
            tracing::warn!("✗ Com erro: {}", report.error_count);
        }

        Ok(report)
    }

    async fn import_tenant(
        &self,
        ctx: &ImportContext<'_>,
        record: &TenantRecord,
    ) -> Result<TenantTally, AppError> {
        record.validate()?;

        let tenant = self.tenants.create_tenant(new_tenant(record)).await?;
        tracing::info!("  ✓ Inquilino criado: {}", tenant.id);

        let mut tally = TenantTally::default();

        for contact in &record.contacts {
            let Some(name) = usable_contact_name(contact) else {
                tally.contacts_skipped += 1;
                continue;
            };

            self.tenants
                .create_contact(new_contact(tenant.id, name.clone(), contact))
                .await?;
            tracing::info!("    ✓ Contato criado: {}", name);
            tally.contacts_created += 1;
        }

        for occupancy in &record.occupancies {
            self.import_occupancy(ctx, tenant.id, occupancy, &mut tally).await?;
        }

        Ok(tally)
    }

    async fn import_occupancy(
        &self,
        ctx: &ImportContext<'_>,
        tenant_id: Uuid,
        occupancy: &OccupancyRecord,
        tally: &mut TenantTally,
    ) -> Result<(), AppError> {
        let building_number = non_empty(&occupancy.building_number);
        let Some(building_id) = building_number
            .as_ref()
            .and_then(|number| ctx.buildings.get(number))
            .copied()
        else {
            tracing::warn!(
                "    ⚠ Ocupação ignorada: prédio {} não encontrado",
                building_number.as_deref().unwrap_or("(vazio)")
            );
            tally.occupancies_skipped += 1;
            return Ok(());
        };

        // Datas primeiro: uma data ruim não deve deixar sala órfã para trás
        let move_in_date = parse_optional_date(&occupancy.move_in_date)?;
        let move_out_date = parse_optional_date(&occupancy.move_out_date)?;

        let unit_id = match non_empty(&occupancy.unit_number) {
            Some(unit_number) => {
                let (unit_id, created) = self
                    .resolve_unit(ctx.property_id, building_id, &unit_number)
                    .await?;
                if created {
                    tally.units_created += 1;
                }
                Some(unit_id)
            }
            None => None,
        };

        self.tenants
            .create_occupancy(NewOccupancy {
                tenant_id,
                property_id: ctx.property_id,
                unit_id,
                move_in_date,
                move_out_date,
                status: non_empty(&occupancy.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                notes: non_empty(&occupancy.notes),
            })
            .await?;

        tracing::info!(
            "    ✓ Ocupação criada: {}",
            non_empty(&occupancy.unit_number).as_deref().unwrap_or("Nível da propriedade")
        );
        tally.occupancies_created += 1;
        Ok(())
    }

    // =========================================================================
    //  5. DRY RUN
    // =========================================================================

    /// Confere o arquivo sem tocar no banco. Ocupações cujo prédio não está
    /// entre os esperados contam como ignoradas.
    pub fn preview(&self, file: &ImportFile) -> ImportPlan {
        let mut plan = ImportPlan {
            tenants: file.tenants.len(),
            ..ImportPlan::default()
        };

        for (index, record) in file.tenants.iter().enumerate() {
            if let Err(e) = self.check_record(record) {
                plan.invalid_tenants.push(TenantFailure {
                    index,
                    tenant_name: record.tenant_name.clone(),
                    error: e.to_string(),
                });
                continue;
            }

            for contact in &record.contacts {
                if usable_contact_name(contact).is_some() {
                    plan.contacts_to_create += 1;
                } else {
                    plan.contacts_skipped += 1;
                }
            }

            for occupancy in &record.occupancies {
                let known = non_empty(&occupancy.building_number).is_some_and(|number| {
                    self.expected_buildings.iter().any(|b| b.number == number)
                });
                if known {
                    plan.occupancies_to_create += 1;
                } else {
                    plan.occupancies_skipped += 1;
                }
            }

            tracing::info!(
                "  [DRY RUN] {}: {} contato(s), {} ocupação(ões)",
                record.tenant_name,
                record.contacts.len(),
                record.occupancies.len()
            );
        }

        plan
    }

    fn check_record(&self, record: &TenantRecord) -> Result<(), AppError> {
        record.validate()?;
        for occupancy in &record.occupancies {
            parse_optional_date(&occupancy.move_in_date)?;
            parse_optional_date(&occupancy.move_out_date)?;
        }
        Ok(())
    }
}
