// src/bin/import_tenants.rs
//
// Importação única de inquilinos a partir do JSON gerado da planilha.
//
//   import_tenants [arquivo.json]
//
// Sem argumento usa IMPORT_FILE. Com IMPORT_DRY_RUN=true só mostra o plano.
// ATENÇÃO: rodar duas vezes duplica inquilinos, contatos e ocupações.

use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use property_desk::{
    config::{self, AppState, Settings},
    models::import::ImportFile,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.import_file.clone());

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Não foi possível ler {}", path.display()))?;
    let file = ImportFile::from_json(&raw)
        .with_context(|| format!("{} não é um arquivo de importação válido", path.display()))?;
    tracing::info!("✓ Arquivo {} carregado com {} inquilino(s)", path.display(), file.tenants.len());

    if settings.import_dry_run {
        tracing::info!("=== DRY RUN ===");
        // Não precisa de banco para conferir o arquivo
        let state = AppState::in_memory(settings, Default::default());
        let plan = state.import_service.preview(&file);

        tracing::info!(
            "Seriam criados {} contato(s) e {} ocupação(ões); {} contato(s) e {} ocupação(ões) seriam ignorados",
            plan.contacts_to_create,
            plan.occupancies_to_create,
            plan.contacts_skipped,
            plan.occupancies_skipped
        );
        for invalid in &plan.invalid_tenants {
            tracing::warn!("✗ [{}] {}: {}", invalid.index + 1, invalid.tenant_name, invalid.error);
        }
        tracing::info!("Defina IMPORT_DRY_RUN=false para importar de verdade.");
        return Ok(());
    }

    let db_pool = config::connect(&settings).await?;
    let property_name = settings.import_property_name.clone();
    let state = AppState::with_pool(settings, db_pool);

    let report = state.import_service.import(&property_name, &file).await?;

    tracing::info!(
        "Resumo: {} importado(s), {} erro(s), {} contato(s), {} ocupação(ões), {} sala(s) nova(s)",
        report.success_count,
        report.error_count,
        report.contacts_created,
        report.occupancies_created,
        report.units_created
    );
    for failure in &report.failures {
        tracing::warn!("✗ [{}] {}: {}", failure.index + 1, failure.tenant_name, failure.error);
    }

    Ok(())
}
